//! Property-based tests for the quotation query engine.
//!
//! A vector-backed repository evaluates filters with `QuotationFilter::matches`
//! so the service's paging, totals and per-user series can be checked against
//! a plain slice of the same rows.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use coinquote_core::currencies::{Currency, CurrencyRepositoryTrait, NewCurrency};
use coinquote_core::quotations::{
    AuditEntry, NewQuotation, Pagination, Quotation, QuotationFilter, QuotationRepositoryTrait,
    QuotationService, QuotationServiceTrait, QuotationUpdate, QuotationWithCurrency,
};
use coinquote_core::{Error, Result};
use coinquote_market_data::ProviderRegistry;

const NAMES: [&str; 3] = ["Bitcoin", "Litecoin", "Ether"];

struct VecRepository {
    currencies: Vec<Currency>,
    rows: Vec<QuotationWithCurrency>,
    favorites: Vec<i32>,
}

impl VecRepository {
    fn filtered(&self, filter: &QuotationFilter, user_id: Option<i32>) -> Vec<QuotationWithCurrency> {
        self.rows
            .iter()
            .filter(|row| user_id.is_none() || self.favorites.contains(&row.quotation.currency_id))
            .filter(|row| filter.matches(row))
            .cloned()
            .collect()
    }
}

fn read_only() -> Error {
    Error::Unexpected("read-only repository".to_string())
}

#[async_trait]
impl CurrencyRepositoryTrait for VecRepository {
    fn get_by_id(&self, currency_id: i32) -> Result<Option<Currency>> {
        Ok(self.currencies.iter().find(|c| c.id == currency_id).cloned())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Currency>> {
        Ok(self.currencies.iter().find(|c| c.name == name).cloned())
    }

    fn get_by_code(&self, code: &str) -> Result<Option<Currency>> {
        Ok(self.currencies.iter().find(|c| c.code == code).cloned())
    }

    fn list(&self) -> Result<Vec<Currency>> {
        Ok(self.currencies.clone())
    }

    async fn create(&self, _new_currency: NewCurrency) -> Result<Currency> {
        Err(read_only())
    }

    async fn update_name(&self, _currency_id: i32, _name: String) -> Result<Currency> {
        Err(read_only())
    }
}

#[async_trait]
impl QuotationRepositoryTrait for VecRepository {
    fn get_by_id(&self, quotation_id: i32) -> Result<Option<Quotation>> {
        Ok(self
            .rows
            .iter()
            .find(|row| row.quotation.id == quotation_id)
            .map(|row| row.quotation.clone()))
    }

    fn find_latest_by_currency_name(&self, name: &str) -> Result<Option<Quotation>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.currency_name == name)
            .max_by_key(|row| row.quotation.timestamp)
            .map(|row| row.quotation.clone()))
    }

    fn list_all(&self) -> Result<Vec<Quotation>> {
        Ok(self.rows.iter().map(|row| row.quotation.clone()).collect())
    }

    fn search(
        &self,
        filter: &QuotationFilter,
        user_id: Option<i32>,
        pagination: Option<&Pagination>,
    ) -> Result<Vec<QuotationWithCurrency>> {
        let rows = self.filtered(filter, user_id);
        Ok(match pagination {
            Some(page) => rows
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.page_size as usize)
                .collect(),
            None => rows,
        })
    }

    fn count(&self, filter: &QuotationFilter, user_id: Option<i32>) -> Result<i64> {
        Ok(self.filtered(filter, user_id).len() as i64)
    }

    async fn create(&self, _new_quotation: NewQuotation) -> Result<Quotation> {
        Err(read_only())
    }

    async fn update(&self, _quotation_id: i32, _update: QuotationUpdate) -> Result<Quotation> {
        Err(read_only())
    }

    async fn delete(&self, _quotation_id: i32) -> Result<usize> {
        Err(read_only())
    }

    async fn record_audit(&self, _entry: AuditEntry) -> Result<()> {
        Err(read_only())
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

// =============================================================================
// Generators
// =============================================================================

/// (currency index, price in cents, minutes after base time)
fn arb_rows() -> impl Strategy<Value = Vec<(usize, i64, i64)>> {
    proptest::collection::vec((0..NAMES.len(), 0i64..10_000_000, 0i64..10_000), 0..60)
}

fn arb_filter() -> impl Strategy<Value = QuotationFilter> {
    (
        proptest::option::of(prop_oneof![
            Just("coin".to_string()),
            Just("BIT".to_string()),
            Just("ether".to_string()),
            Just("xyz".to_string()),
        ]),
        proptest::option::of(0i64..10_000_000),
        proptest::option::of(0i64..10_000_000),
        proptest::option::of(0i64..10_000),
        proptest::option::of(0i64..10_000),
    )
        .prop_map(|(name, min, max, start, end)| QuotationFilter {
            name_contains: name,
            min_price: min.map(|cents| Decimal::new(cents, 2)),
            max_price: max.map(|cents| Decimal::new(cents, 2)),
            start_date: start.map(|m| base_time() + Duration::minutes(m)),
            end_date: end.map(|m| base_time() + Duration::minutes(m)),
        })
}

fn arb_pagination() -> impl Strategy<Value = Pagination> {
    (1i64..15, 1i64..8).prop_map(|(size, number)| Pagination::new(size, number))
}

fn build_repository(rows: &[(usize, i64, i64)], favorites: Vec<i32>) -> Arc<VecRepository> {
    let currencies: Vec<Currency> = NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Currency {
            id: i as i32 + 1,
            name: name.to_string(),
            code: name[..3].to_uppercase(),
        })
        .collect();
    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, (currency, cents, minutes))| QuotationWithCurrency {
            quotation: Quotation {
                id: i as i32 + 1,
                currency_id: *currency as i32 + 1,
                price: Decimal::new(*cents, 2),
                timestamp: base_time() + Duration::minutes(*minutes),
                is_manual: false,
                user_id: None,
            },
            currency_name: NAMES[*currency].to_string(),
        })
        .collect();
    Arc::new(VecRepository {
        currencies,
        rows,
        favorites,
    })
}

fn service(repository: Arc<VecRepository>) -> QuotationService {
    QuotationService::new(
        repository.clone(),
        repository,
        Arc::new(ProviderRegistry::with_providers(Vec::new())),
    )
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A page holds at most `pageSize` rows and is the slice of the filtered
    /// set starting at the page offset.
    #[test]
    fn prop_page_is_slice_of_filtered_set(
        rows in arb_rows(),
        filter in arb_filter(),
        pagination in arb_pagination(),
    ) {
        let repository = build_repository(&rows, Vec::new());
        let expected: Vec<_> = repository
            .filtered(&filter, None)
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.page_size as usize)
            .collect();

        let result = service(repository).query(&filter, &pagination, None).unwrap();

        prop_assert!(result.quotations.len() as i64 <= pagination.page_size);
        prop_assert_eq!(result.quotations, expected);
        prop_assert_eq!(result.summary.page_size, pagination.page_size);
        prop_assert_eq!(result.summary.page_number, pagination.page_number);
    }

    /// The total counts every matching row regardless of the requested page.
    #[test]
    fn prop_total_is_independent_of_page(
        rows in arb_rows(),
        filter in arb_filter(),
        first in arb_pagination(),
        second in arb_pagination(),
    ) {
        let repository = build_repository(&rows, Vec::new());
        let matching = repository.filtered(&filter, None).len() as i64;
        let service = service(repository);

        let a = service.query(&filter, &first, None).unwrap();
        let b = service.query(&filter, &second, None).unwrap();

        prop_assert_eq!(a.summary.total_results, matching);
        prop_assert_eq!(b.summary.total_results, matching);
        prop_assert!(a.summary.series.is_none());
    }

    /// Every returned row satisfies every present predicate.
    #[test]
    fn prop_rows_satisfy_filter(
        rows in arb_rows(),
        filter in arb_filter(),
        pagination in arb_pagination(),
    ) {
        let result = service(build_repository(&rows, Vec::new()))
            .query(&filter, &pagination, None)
            .unwrap();

        for row in &result.quotations {
            if let Some(min) = filter.min_price {
                prop_assert!(row.quotation.price >= min);
            }
            if let Some(max) = filter.max_price {
                prop_assert!(row.quotation.price <= max);
            }
            if let Some(start) = filter.start_date {
                prop_assert!(row.quotation.timestamp >= start);
            }
            if let Some(end) = filter.end_date {
                prop_assert!(row.quotation.timestamp <= end);
            }
        }
    }

    /// A minimum price above the maximum yields an empty result.
    #[test]
    fn prop_inverted_price_range_is_empty(
        rows in arb_rows(),
        low in 0i64..5_000_000,
        gap in 1i64..5_000_000,
        pagination in arb_pagination(),
    ) {
        let filter = QuotationFilter {
            min_price: Some(Decimal::new(low + gap, 2)),
            max_price: Some(Decimal::new(low, 2)),
            ..Default::default()
        };

        let result = service(build_repository(&rows, vec![1, 2, 3]))
            .query(&filter, &pagination, Some(1))
            .unwrap();

        prop_assert!(result.quotations.is_empty());
        prop_assert_eq!(result.summary.total_results, 0);
        prop_assert_eq!(result.summary.series.unwrap_or_default().values.len(), 0);
    }

    /// Per-user series cover the whole filtered favorite set, in id order.
    #[test]
    fn prop_user_series_spans_filtered_set(
        rows in arb_rows(),
        filter in arb_filter(),
        pagination in arb_pagination(),
        favorites in proptest::sample::subsequence(vec![1, 2, 3], 0..=3),
    ) {
        let repository = build_repository(&rows, favorites.clone());
        let expected = repository.filtered(&filter, Some(1));

        let result = service(repository).query(&filter, &pagination, Some(1)).unwrap();
        let series = result.summary.series.unwrap();

        prop_assert_eq!(series.values.len() as i64, result.summary.total_results);
        prop_assert_eq!(series.dates.len(), series.values.len());
        prop_assert_eq!(series.currency_names.len(), series.values.len());
        for (i, row) in expected.iter().enumerate() {
            prop_assert_eq!(series.values[i], row.quotation.price);
            prop_assert!(favorites.contains(&row.quotation.currency_id));
        }
    }

    /// Query parameters never produce an invalid page.
    #[test]
    fn prop_params_fall_back_to_valid_pagination(
        size in proptest::option::of(-20i64..50),
        number in proptest::option::of(-20i64..50),
    ) {
        let pagination = Pagination::from_params(size, number);

        prop_assert!(pagination.validate().is_ok());
        prop_assert!(pagination.offset() >= 0);
    }
}
