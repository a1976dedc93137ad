//! Quotations module - domain models, the filtered query engine, and traits.

mod quotations_model;
mod quotations_service;
mod quotations_traits;


pub use quotations_model::{
    AuditEntry, NewQuotation, Pagination, Quotation, QuotationFilter, QuotationQueryResult,
    QuotationSeries, QuotationSummary, QuotationUpdate, QuotationWithCurrency,
};
pub use quotations_service::QuotationService;
pub use quotations_traits::{QuotationRepositoryTrait, QuotationServiceTrait};
