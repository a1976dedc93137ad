//! Database models for quotations and their audit log.

use chrono::Utc;
use diesel::prelude::*;

use coinquote_core::quotations::{AuditEntry, NewQuotation, Quotation};

use crate::errors::StorageError;
use crate::utils::{format_timestamp, parse_price, parse_timestamp, price_sort_key};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::quotations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuotationDB {
    pub id: i32,
    pub currency_id: i32,
    pub price: String,
    pub quoted_at: String,
    pub is_manual: bool,
    pub user_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quotations)]
pub struct NewQuotationDB {
    pub currency_id: i32,
    pub price: String,
    pub price_key: String,
    pub quoted_at: String,
    pub is_manual: bool,
    pub user_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::quotation_audit)]
pub struct NewAuditEntryDB {
    pub user_id: Option<i32>,
    pub quotation_id: Option<i32>,
    pub message: String,
    pub created_at: String,
}

impl TryFrom<QuotationDB> for Quotation {
    type Error = StorageError;

    fn try_from(db: QuotationDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            currency_id: db.currency_id,
            price: parse_price(&db.price)?,
            timestamp: parse_timestamp(&db.quoted_at)?,
            is_manual: db.is_manual,
            user_id: db.user_id,
        })
    }
}

impl From<NewQuotation> for NewQuotationDB {
    fn from(domain: NewQuotation) -> Self {
        Self {
            currency_id: domain.currency_id,
            price: domain.price.to_string(),
            price_key: price_sort_key(&domain.price),
            quoted_at: format_timestamp(&domain.timestamp),
            is_manual: domain.is_manual,
            user_id: domain.user_id,
        }
    }
}

impl From<AuditEntry> for NewAuditEntryDB {
    fn from(domain: AuditEntry) -> Self {
        Self {
            user_id: domain.user_id,
            quotation_id: domain.quotation_id,
            message: domain.message,
            created_at: format_timestamp(&Utc::now()),
        }
    }
}
