//! CoinPaprika provider.
//!
//! Prices are read in two steps: the coin list maps a currency name to a
//! CoinPaprika coin id, then the ticker of that id carries the price per
//! fiat currency.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::ExternalQuote;
use crate::provider::QuoteProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "coinpaprika";

const BASE_URL: &str = "https://api.coinpaprika.com/v1";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Entry of `GET /v1/coins`
#[derive(Debug, Deserialize)]
struct CoinSummary {
    id: String,
    name: String,
}

/// Response of `GET /v1/tickers/{id}`
#[derive(Debug, Deserialize)]
struct TickerResponse {
    quotes: HashMap<String, TickerQuote>,
}

#[derive(Debug, Deserialize)]
struct TickerQuote {
    price: f64,
}

pub struct CoinPaprikaProvider {
    client: Client,
}

impl Default for CoinPaprikaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinPaprikaProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MarketDataError> {
        debug!("CoinPaprika request: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("CoinPaprika returned {} for {}", status, url);
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("{} returned {}", url, status),
            });
        }
        response
            .json()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }

    /// Exact, case-sensitive match on the coin name; the first match wins.
    fn find_coin_id<'a>(coins: &'a [CoinSummary], name: &str) -> Option<&'a str> {
        coins
            .iter()
            .find(|coin| coin.name == name)
            .map(|coin| coin.id.as_str())
    }

    fn price_in(ticker: &TickerResponse, fiat: &str) -> Result<Decimal, MarketDataError> {
        let quote = ticker
            .quotes
            .get(fiat)
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("no {} price in ticker", fiat),
            })?;
        Decimal::try_from(quote.price).map_err(|_| MarketDataError::ValidationFailed {
            message: format!("Failed to convert price {} to decimal", quote.price),
        })
    }
}

#[async_trait]
impl QuoteProvider for CoinPaprikaProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_external_quote(
        &self,
        name: &str,
        _code: &str,
        fiat: &str,
    ) -> Result<ExternalQuote, MarketDataError> {
        let coins: Vec<CoinSummary> = self.get_json(&format!("{}/coins", BASE_URL)).await?;
        let coin_id = Self::find_coin_id(&coins, name)
            .ok_or_else(|| MarketDataError::SymbolNotFound(name.to_string()))?;

        let ticker: TickerResponse = self
            .get_json(&format!("{}/tickers/{}?quotes={}", BASE_URL, coin_id, fiat))
            .await?;
        let price = Self::price_in(&ticker, fiat)?;

        Ok(ExternalQuote::now(price, fiat, PROVIDER_ID))
    }
}
