//! Quotation domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::errors::{Result, ValidationError};

/// A priced snapshot of a currency at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: i32,
    pub currency_id: i32,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub is_manual: bool,
    pub user_id: Option<i32>,
}

/// Input model for storing a quotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewQuotation {
    pub currency_id: i32,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub user_id: Option<i32>,
}

fn validate_price(price: Decimal) -> Result<()> {
    if price.is_sign_negative() {
        return Err(ValidationError::InvalidInput(format!(
            "price must not be negative, got {}",
            price
        ))
        .into());
    }
    Ok(())
}

impl NewQuotation {
    pub fn validate(&self) -> Result<()> {
        validate_price(self.price)
    }
}

/// Price and timestamp changes for an existing quotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationUpdate {
    pub price: Decimal,
    /// Keeps the stored timestamp when absent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl QuotationUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_price(self.price)
    }
}

/// Quotation joined with the name of its currency, as returned by queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationWithCurrency {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub currency_name: String,
}

/// Optional predicates for quotation queries. Absent fields impose no
/// constraint; present ones are ANDed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationFilter {
    pub name_contains: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl QuotationFilter {
    /// A `min_price` above `max_price` can never match anything.
    pub fn has_empty_price_range(&self) -> bool {
        matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max)
    }

    /// Same predicate the storage layer evaluates in SQL. Name matching is
    /// case-insensitive, like SQLite's `LIKE` on ASCII text.
    pub fn matches(&self, row: &QuotationWithCurrency) -> bool {
        let q = &row.quotation;
        if let Some(needle) = &self.name_contains {
            if !row
                .currency_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| q.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| q.price > max) {
            return false;
        }
        if self.start_date.is_some_and(|start| q.timestamp < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| q.timestamp > end) {
            return false;
        }
        true
    }
}

/// Page selection for quotation queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_size: i64,
    pub page_number: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: DEFAULT_PAGE_NUMBER,
        }
    }
}

impl Pagination {
    pub fn new(page_size: i64, page_number: i64) -> Self {
        Self {
            page_size,
            page_number,
        }
    }

    /// Missing or non-positive values fall back to the defaults.
    pub fn from_params(page_size: Option<i64>, page_number: Option<i64>) -> Self {
        Self {
            page_size: page_size
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            page_number: page_number
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_PAGE_NUMBER),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size <= 0 {
            return Err(ValidationError::InvalidInput(format!(
                "pageSize must be positive, got {}",
                self.page_size
            ))
            .into());
        }
        if self.page_number <= 0 {
            return Err(ValidationError::InvalidInput(format!(
                "pageNumber must be positive, got {}",
                self.page_number
            ))
            .into());
        }
        Ok(())
    }

    pub fn offset(&self) -> i64 {
        self.page_size.saturating_mul(self.page_number - 1)
    }
}

/// Parallel value/date/name arrays over every quotation matching a
/// per-user query, in quotation id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSeries {
    pub values: Vec<Decimal>,
    pub dates: Vec<DateTime<Utc>>,
    pub currency_names: Vec<String>,
}

impl QuotationSeries {
    pub fn from_rows(rows: &[QuotationWithCurrency]) -> Self {
        let mut series = Self::default();
        for row in rows {
            series.values.push(row.quotation.price);
            series.dates.push(row.quotation.timestamp);
            series.currency_names.push(row.currency_name.clone());
        }
        series
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    /// Size of the whole filtered set, not of the returned page
    pub total_results: i64,
    pub page_number: i64,
    pub page_size: i64,
    /// Only present for per-user queries
    #[serde(flatten)]
    pub series: Option<QuotationSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotationQueryResult {
    pub quotations: Vec<QuotationWithCurrency>,
    pub summary: QuotationSummary,
}

/// Audit log line written for manual quotation changes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub user_id: Option<i32>,
    pub quotation_id: Option<i32>,
    pub message: String,
}
