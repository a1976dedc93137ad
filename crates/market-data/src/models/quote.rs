use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current price of a currency as reported by an external provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalQuote {
    /// Price of one unit, in `fiat`
    pub price: Decimal,
    /// Fiat currency code (e.g., "USD")
    pub fiat: String,
    /// When the price was read
    pub timestamp: DateTime<Utc>,
    /// Provider name (e.g., "coinpaprika")
    pub source: String,
}

impl ExternalQuote {
    /// Creates a quote stamped with the current time.
    pub fn now(price: Decimal, fiat: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            price,
            fiat: fiat.into(),
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}
