//! Coinquote Market Data Crate
//!
//! This crate fetches real-time crypto currency prices from external sources.
//!
//! # Overview
//!
//! - [`QuoteProvider`] - One external price source, addressed by a fixed name
//! - [`ProviderRegistry`] - Name to provider lookup; unknown names are an error
//! - [`ExternalQuote`] - A price in a fiat currency with the time it was read
//!
//! # Providers
//!
//! | Name          | Source                                   |
//! |---------------|------------------------------------------|
//! | `coinpaprika` | CoinPaprika coin list + ticker endpoints |
//! | `criptoya`    | CriptoYa exchange quotes                 |
//!
//! ```text
//! caller --name--> ProviderRegistry --> QuoteProvider --HTTP--> source
//!                                            |
//!                                            v
//!                                      ExternalQuote
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use errors::MarketDataError;
pub use models::ExternalQuote;
pub use provider::{CoinPaprikaProvider, CriptoYaProvider, QuoteProvider};
pub use registry::ProviderRegistry;
