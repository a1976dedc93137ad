//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching external quotes.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// No provider is registered under the requested name.
    #[error("Quote provider '{0}' is not supported")]
    UnsupportedProvider(String),

    /// The provider does not know the requested currency.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Name of the provider involved, when the error came from one.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::UnsupportedProvider(provider) | Self::ProviderError { provider, .. } => {
                Some(provider)
            }
            _ => None,
        }
    }
}
