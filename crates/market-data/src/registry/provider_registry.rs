use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::MarketDataError;
use crate::provider::{CoinPaprikaProvider, CriptoYaProvider, QuoteProvider};

/// Fixed name to provider map.
///
/// Providers are looked up by the name clients send; there is no fallback
/// between providers.
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn QuoteProvider>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// Registry with the built-in providers.
    pub fn new() -> Self {
        Self::with_providers(vec![
            Arc::new(CoinPaprikaProvider::new()),
            Arc::new(CriptoYaProvider::new()),
        ])
    }

    /// Registry over the given providers, keyed by their ids. A later
    /// provider replaces an earlier one with the same id.
    pub fn with_providers(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        let providers = providers
            .into_iter()
            .map(|provider| (provider.id(), provider))
            .collect();
        Self { providers }
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn QuoteProvider>, MarketDataError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| MarketDataError::UnsupportedProvider(name.to_string()))
    }

    /// Registered provider names, sorted.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.providers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
