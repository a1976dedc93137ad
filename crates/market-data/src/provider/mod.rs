//! External quote providers.

pub mod coinpaprika;
pub mod criptoya;
mod traits;

pub use coinpaprika::CoinPaprikaProvider;
pub use criptoya::CriptoYaProvider;
pub use traits::QuoteProvider;
