//! CriptoYa provider.
//!
//! `GET /api/{code}/{fiat}/{volume}` returns one quote per exchange; the ask
//! price of the first available exchange, in preference order, is used.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::ExternalQuote;
use crate::provider::QuoteProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "criptoya";

const BASE_URL: &str = "https://criptoya.com/api";

/// Traded volume the quote is requested for
const QUOTE_VOLUME: &str = "0.10";

/// Exchanges tried in order
const EXCHANGE_PREFERENCE: &[&str] = &[
    "satoshitango",
    "letsbit",
    "binancep2p",
    "fiwind",
    "tiendacrypto",
    "calypso",
    "banexcoin",
    "bitsoalpha",
    "x4t",
];

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One exchange's entry; other fields in the payload are ignored.
#[derive(Debug, Deserialize)]
struct ExchangeQuote {
    ask: f64,
}

pub struct CriptoYaProvider {
    client: Client,
}

impl Default for CriptoYaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CriptoYaProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn quote_url(code: &str, fiat: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            BASE_URL,
            code.to_lowercase(),
            fiat.to_lowercase(),
            QUOTE_VOLUME
        )
    }

    fn preferred_ask(
        exchanges: &HashMap<String, ExchangeQuote>,
        code: &str,
    ) -> Result<Decimal, MarketDataError> {
        let ask = EXCHANGE_PREFERENCE
            .iter()
            .filter_map(|name| exchanges.get(*name))
            .map(|quote| quote.ask)
            .find(|ask| *ask > 0.0)
            .ok_or_else(|| MarketDataError::SymbolNotFound(code.to_string()))?;
        Decimal::try_from(ask).map_err(|_| MarketDataError::ValidationFailed {
            message: format!("Failed to convert ask {} to decimal", ask),
        })
    }
}

#[async_trait]
impl QuoteProvider for CriptoYaProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_external_quote(
        &self,
        _name: &str,
        code: &str,
        fiat: &str,
    ) -> Result<ExternalQuote, MarketDataError> {
        let url = Self::quote_url(code, fiat);
        debug!("CriptoYa request: {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("CriptoYa returned {} for {}", status, url);
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("{} returned {}", url, status),
            });
        }

        let exchanges: HashMap<String, ExchangeQuote> =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;
        let price = Self::preferred_ask(&exchanges, code)?;

        Ok(ExternalQuote::now(price, fiat, PROVIDER_ID))
    }
}
