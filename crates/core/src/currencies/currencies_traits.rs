use async_trait::async_trait;

use super::currencies_model::{Currency, NewCurrency};
use crate::errors::Result;
use crate::quotations::Quotation;

/// Trait for currency repository operations
#[async_trait]
pub trait CurrencyRepositoryTrait: Send + Sync {
    fn get_by_id(&self, currency_id: i32) -> Result<Option<Currency>>;
    fn get_by_name(&self, name: &str) -> Result<Option<Currency>>;
    fn get_by_code(&self, code: &str) -> Result<Option<Currency>>;
    /// All currencies ordered by id.
    fn list(&self) -> Result<Vec<Currency>>;
    async fn create(&self, new_currency: NewCurrency) -> Result<Currency>;
    async fn update_name(&self, currency_id: i32, name: String) -> Result<Currency>;
}

/// Trait for currency service operations
#[async_trait]
pub trait CurrencyServiceTrait: Send + Sync {
    fn get_currency(&self, currency_id: i32) -> Result<Currency>;
    fn get_currency_by_name(&self, name: &str) -> Result<Currency>;
    fn list_currencies(&self) -> Result<Vec<Currency>>;
    async fn register_currency(&self, new_currency: NewCurrency) -> Result<Currency>;
    async fn update_currency_name(&self, currency_id: i32, name: String) -> Result<Currency>;
    /// Registers a new currency and stores its current price from `provider`.
    async fn register_with_external_quote(
        &self,
        new_currency: NewCurrency,
        provider: &str,
    ) -> Result<(Currency, Quotation)>;
}
