use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use coinquote_core::currencies::{Currency, CurrencyRepositoryTrait, NewCurrency};
use coinquote_core::errors::Error;
use coinquote_core::Result;

use super::model::{CurrencyDB, NewCurrencyDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::currencies;

pub struct CurrencyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CurrencyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn find_one<F>(&self, query: F) -> Result<Option<Currency>>
    where
        F: FnOnce(&mut SqliteConnection) -> QueryResult<CurrencyDB>,
    {
        let mut conn = get_connection(&self.pool)?;
        Ok(query(&mut *conn).optional().into_core()?.map(Currency::from))
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for CurrencyRepository {
    fn get_by_id(&self, currency_id: i32) -> Result<Option<Currency>> {
        self.find_one(|conn| {
            currencies::table
                .find(currency_id)
                .select(CurrencyDB::as_select())
                .first::<CurrencyDB>(conn)
        })
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Currency>> {
        self.find_one(|conn| {
            currencies::table
                .filter(currencies::name.eq(name))
                .select(CurrencyDB::as_select())
                .first::<CurrencyDB>(conn)
        })
    }

    fn get_by_code(&self, code: &str) -> Result<Option<Currency>> {
        self.find_one(|conn| {
            currencies::table
                .filter(currencies::code.eq(code))
                .select(CurrencyDB::as_select())
                .first::<CurrencyDB>(conn)
        })
    }

    fn list(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = currencies::table
            .order(currencies::id.asc())
            .select(CurrencyDB::as_select())
            .load::<CurrencyDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Currency::from).collect())
    }

    async fn create(&self, new_currency: NewCurrency) -> Result<Currency> {
        let new_currency_db = NewCurrencyDB::from(new_currency);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Currency> {
                let row = diesel::insert_into(currencies::table)
                    .values(&new_currency_db)
                    .returning(CurrencyDB::as_returning())
                    .get_result::<CurrencyDB>(conn)
                    .into_core()?;
                Ok(Currency::from(row))
            })
            .await
    }

    async fn update_name(&self, currency_id: i32, name: String) -> Result<Currency> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Currency> {
                let row = diesel::update(currencies::table.find(currency_id))
                    .set(currencies::name.eq(name))
                    .returning(CurrencyDB::as_returning())
                    .get_result::<CurrencyDB>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| Error::not_found("currency", currency_id))?;
                Ok(Currency::from(row))
            })
            .await
    }
}
