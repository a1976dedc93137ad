//! SQLite storage implementation for quotations, including the filtered
//! query used by the quotation query engine.

mod model;
mod repository;

pub use model::{NewAuditEntryDB, NewQuotationDB, QuotationDB};
pub use repository::QuotationRepository;
