use async_trait::async_trait;

use super::quotations_model::{
    AuditEntry, NewQuotation, Pagination, Quotation, QuotationFilter, QuotationQueryResult,
    QuotationUpdate, QuotationWithCurrency,
};
use crate::errors::Result;

/// Trait for quotation repository operations
#[async_trait]
pub trait QuotationRepositoryTrait: Send + Sync {
    fn get_by_id(&self, quotation_id: i32) -> Result<Option<Quotation>>;
    /// Most recent quotation of the named currency by timestamp.
    fn find_latest_by_currency_name(&self, name: &str) -> Result<Option<Quotation>>;
    /// Unfiltered scan. Rows that fail to parse are skipped.
    fn list_all(&self) -> Result<Vec<Quotation>>;
    /// Filtered rows in quotation id order. `user_id` restricts to that user's
    /// favorite currencies; `pagination` of `None` returns the whole set.
    fn search(
        &self,
        filter: &QuotationFilter,
        user_id: Option<i32>,
        pagination: Option<&Pagination>,
    ) -> Result<Vec<QuotationWithCurrency>>;
    fn count(&self, filter: &QuotationFilter, user_id: Option<i32>) -> Result<i64>;
    async fn create(&self, new_quotation: NewQuotation) -> Result<Quotation>;
    async fn update(&self, quotation_id: i32, update: QuotationUpdate) -> Result<Quotation>;
    async fn delete(&self, quotation_id: i32) -> Result<usize>;
    async fn record_audit(&self, entry: AuditEntry) -> Result<()>;
}

/// Trait for quotation service operations
#[async_trait]
pub trait QuotationServiceTrait: Send + Sync {
    fn query(
        &self,
        filter: &QuotationFilter,
        pagination: &Pagination,
        user_id: Option<i32>,
    ) -> Result<QuotationQueryResult>;
    fn find_latest(&self, currency_name: &str) -> Result<Option<Quotation>>;
    fn find_all(&self) -> Result<Vec<Quotation>>;
    fn get_quotation(&self, quotation_id: i32) -> Result<Quotation>;
    async fn save_quotation(&self, new_quotation: NewQuotation) -> Result<Quotation>;
    async fn update_quotation(
        &self,
        quotation_id: i32,
        update: QuotationUpdate,
    ) -> Result<Quotation>;
    /// Asks `provider` for the current price of a registered currency.
    async fn fetch_external_quote(
        &self,
        currency_name: &str,
        provider: &str,
        fiat: &str,
    ) -> Result<NewQuotation>;
    async fn save_external_quotation(
        &self,
        currency_name: &str,
        provider: &str,
    ) -> Result<Quotation>;
}
