//! Tests for CurrencyService registration and external-quote ingestion.

#[cfg(test)]
mod tests {
    use crate::currencies::{CurrencyService, CurrencyServiceTrait, NewCurrency};
    use crate::errors::{Error, ValidationError};
    use crate::quotations::{QuotationRepositoryTrait, QuotationService};
    use crate::testing::{FailingQuoteProvider, FixedQuoteProvider, InMemoryStore};
    use coinquote_market_data::{MarketDataError, ProviderRegistry};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn service(store: &InMemoryStore) -> CurrencyService {
        let registry = ProviderRegistry::with_providers(vec![
            Arc::new(FixedQuoteProvider {
                id: "coinpaprika",
                price: dec!(64000.12),
            }),
            Arc::new(FailingQuoteProvider),
        ]);
        let quotation_service = Arc::new(QuotationService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(registry),
        ));
        CurrencyService::new(Arc::new(store.clone()), quotation_service)
    }

    #[tokio::test]
    async fn test_register_currency_trims_fields() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let currency = service
            .register_currency(NewCurrency::new("  Bitcoin ", " BTC"))
            .await
            .unwrap();

        assert_eq!(currency.name, "Bitcoin");
        assert_eq!(currency.code, "BTC");
        assert_eq!(service.get_currency_by_name("Bitcoin").unwrap(), currency);
    }

    #[tokio::test]
    async fn test_register_currency_rejects_blank_code() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let result = service.register_currency(NewCurrency::new("Bitcoin", "")).await;

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::MissingField(field))) if field == "code"
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_name_is_constraint_violation() {
        let store = InMemoryStore::new();
        store.add_currency("Bitcoin", "BTC");
        let service = service(&store);

        let result = service
            .register_currency(NewCurrency::new("Bitcoin", "XBT"))
            .await;

        assert!(matches!(result, Err(Error::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_update_name_of_missing_currency_is_not_found() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let result = service.update_currency_name(7, "Ether".to_string()).await;

        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_update_name_to_taken_name_is_rejected() {
        let store = InMemoryStore::new();
        store.add_currency("Bitcoin", "BTC");
        let ether = store.add_currency("Ether", "ETH");
        let service = service(&store);

        let result = service
            .update_currency_name(ether.id, "Bitcoin".to_string())
            .await;
        assert!(matches!(result, Err(Error::ConstraintViolation(_))));

        let renamed = service
            .update_currency_name(ether.id, "Ethereum".to_string())
            .await
            .unwrap();
        assert_eq!(renamed.name, "Ethereum");
        assert_eq!(renamed.code, "ETH");
    }

    #[tokio::test]
    async fn test_register_with_external_quote_saves_both() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let (currency, quotation) = service
            .register_with_external_quote(NewCurrency::new("Bitcoin", "BTC"), "coinpaprika")
            .await
            .unwrap();

        assert_eq!(quotation.currency_id, currency.id);
        assert_eq!(quotation.price, dec!(64000.12));
        assert!(!quotation.is_manual);
        assert_eq!(quotation.user_id, None);
        let latest = store.find_latest_by_currency_name("Bitcoin").unwrap();
        assert_eq!(latest, Some(quotation));
    }

    #[tokio::test]
    async fn test_register_with_unknown_provider_fails_with_provider_error() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let result = service
            .register_with_external_quote(NewCurrency::new("Bitcoin", "BTC"), "binance")
            .await;

        assert!(matches!(
            result,
            Err(Error::MarketData(MarketDataError::UnsupportedProvider(name))) if name == "binance"
        ));
    }

    #[tokio::test]
    async fn test_register_with_failing_provider_surfaces_upstream_error() {
        let store = InMemoryStore::new();
        let service = service(&store);

        let result = service
            .register_with_external_quote(NewCurrency::new("Bitcoin", "BTC"), "failing")
            .await;

        assert!(matches!(
            result,
            Err(Error::MarketData(MarketDataError::ProviderError { .. }))
        ));
        assert!(store.find_latest_by_currency_name("Bitcoin").unwrap().is_none());
    }
}
