//! Currency domain models.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// A tracked crypto currency, unique by name and by code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: i32,
    pub name: String,
    pub code: String,
}

/// Input model for registering a currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewCurrency {
    pub name: String,
    pub code: String,
}

impl NewCurrency {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Builds a currency known only by name. The code is the upper-cased name
    /// so it stays unique alongside the name.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::new(name, name.to_uppercase())
    }

    /// Trims both fields and rejects blanks.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.code.trim().is_empty() {
            return Err(ValidationError::MissingField("code".to_string()).into());
        }
        Ok(())
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            code: self.code.trim().to_string(),
        }
    }
}
