//! Database models for currencies.

use diesel::prelude::*;

use coinquote_core::currencies::{Currency, NewCurrency};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub id: i32,
    pub name: String,
    pub code: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::currencies)]
pub struct NewCurrencyDB {
    pub name: String,
    pub code: String,
}

impl From<CurrencyDB> for Currency {
    fn from(db: CurrencyDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            code: db.code,
        }
    }
}

impl From<NewCurrency> for NewCurrencyDB {
    fn from(domain: NewCurrency) -> Self {
        Self {
            name: domain.name,
            code: domain.code,
        }
    }
}
