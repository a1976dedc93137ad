//! User domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MINIMUM_USER_AGE;
use crate::errors::{Error, Result, ValidationError};

/// Identity document presented at registration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Dni,
    Passport,
    IdCard,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Dni => "DNI",
            DocumentType::Passport => "PASSPORT",
            DocumentType::IdCard => "ID_CARD",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DNI" => Ok(DocumentType::Dni),
            "PASSPORT" => Ok(DocumentType::Passport),
            "ID_CARD" => Ok(DocumentType::IdCard),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown document type '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub user_code: String,
    pub email: String,
    pub document_type: DocumentType,
    pub registered_at: DateTime<Utc>,
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Profile fields for creating a user or replacing an existing profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub user_code: String,
    pub email: String,
    pub document_type: DocumentType,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewUser {
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("userCode", &self.user_code),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        ensure_adult(self.birth_date, today)
    }
}

/// True when someone born on `birth_date` is at least 18 on `today`.
pub fn is_adult(birth_date: NaiveDate, today: NaiveDate) -> bool {
    today
        .years_since(birth_date)
        .is_some_and(|age| age >= MINIMUM_USER_AGE)
}

pub(crate) fn ensure_adult(birth_date: NaiveDate, today: NaiveDate) -> Result<()> {
    if !is_adult(birth_date, today) {
        return Err(ValidationError::InvalidInput(format!(
            "user must be at least {} years old",
            MINIMUM_USER_AGE
        ))
        .into());
    }
    Ok(())
}

/// What a patch does to the favorites set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FavoritesChange {
    #[default]
    Keep,
    Clear,
    /// Replace the whole set with these currency codes
    Replace(Vec<String>),
}

/// Partial update of a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub document_type: Option<DocumentType>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub favorites: FavoritesChange,
}

impl UserPatch {
    pub fn has_profile_changes(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.birth_date.is_some()
            || self.email.is_some()
            || self.document_type.is_some()
            || self.is_active.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_profile_changes() && self.favorites == FavoritesChange::Keep
    }
}

/// Create-or-update request. Favorites are given by currency name and are
/// registered when unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    pub id: Option<i32>,
    #[serde(flatten)]
    pub user: NewUser,
    #[serde(default)]
    pub favorite_names: Vec<String>,
}

/// Price entered by hand for a currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManualQuotation {
    pub currency_id: i32,
    pub price: Decimal,
    /// Defaults to now
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
