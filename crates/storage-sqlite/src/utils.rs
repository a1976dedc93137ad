//! Text encodings for values SQLite has no native type for.
//!
//! Prices are stored as exact decimal strings and instants as RFC 3339 UTC
//! with second precision. The fixed width keeps text order equal to time
//! order, so range filters and `ORDER BY` work on the raw column. Each price
//! also gets a fixed-width sort key for exact range filters.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Timelike, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Smallest stored instant that is not before `value`. Stored instants have
/// whole seconds, so a fractional lower bound rounds up.
pub fn format_lower_bound(value: &DateTime<Utc>) -> String {
    let truncated = value.with_nanosecond(0).unwrap_or(*value);
    if truncated < *value {
        format_timestamp(&(truncated + Duration::seconds(1)))
    } else {
        format_timestamp(&truncated)
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("timestamp '{}': {}", value, e)))
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| StorageError::Corrupt(format!("date '{}': {}", value, e)))
}

/// Digits on each side of the point; enough for any `Decimal`.
const PRICE_INTEGER_DIGITS: usize = 29;
const PRICE_FRACTION_DIGITS: usize = 28;

/// Zero-padded text whose order equals numeric order for non-negative
/// prices. Negative values get a `-` prefix and sort below every stored
/// price, which is all a bound needs.
pub fn price_sort_key(value: &Decimal) -> String {
    let text = value.abs().normalize().to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let key = format!(
        "{:0>iw$}.{:0<fw$}",
        integer,
        fraction,
        iw = PRICE_INTEGER_DIGITS,
        fw = PRICE_FRACTION_DIGITS
    );
    if value.is_sign_negative() && !value.is_zero() {
        format!("-{}", key)
    } else {
        key
    }
}

pub fn parse_price(value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::Corrupt(format!("price '{}': {}", value, e)))
}
