//! SQLite storage implementation for currencies.

mod model;
mod repository;

pub use model::{CurrencyDB, NewCurrencyDB};
pub use repository::CurrencyRepository;
