//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::ExternalQuote;

/// Trait for external price sources.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use coinquote_market_data::{ExternalQuote, MarketDataError, QuoteProvider};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl QuoteProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "fixed"
///     }
///
///     async fn get_external_quote(
///         &self,
///         _name: &str,
///         _code: &str,
///         fiat: &str,
///     ) -> Result<ExternalQuote, MarketDataError> {
///         Ok(ExternalQuote::now(rust_decimal::Decimal::ONE, fiat, self.id()))
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Name the provider is registered under, e.g. "coinpaprika".
    fn id(&self) -> &'static str;

    /// Fetch the current price of a currency, given its name and code, in
    /// the requested fiat currency.
    async fn get_external_quote(
        &self,
        name: &str,
        code: &str,
        fiat: &str,
    ) -> Result<ExternalQuote, MarketDataError>;
}
