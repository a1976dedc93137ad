//! Coinquote Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for tracking crypto currency quotes:
//! currencies, quotations (automatic or manual), users with favorite
//! currencies, and CSV exports. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod currencies;
pub mod errors;
pub mod exports;
pub mod quotations;
pub mod users;

#[cfg(test)]
mod testing;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
