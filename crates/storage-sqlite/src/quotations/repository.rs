use async_trait::async_trait;
use diesel::helper_types::{InnerJoin, IntoBoxed};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use log::warn;
use std::sync::Arc;

use coinquote_core::errors::Error;
use coinquote_core::quotations::{
    AuditEntry, NewQuotation, Pagination, Quotation, QuotationFilter, QuotationRepositoryTrait,
    QuotationUpdate, QuotationWithCurrency,
};
use coinquote_core::Result;

use super::model::{NewAuditEntryDB, NewQuotationDB, QuotationDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{currencies, quotation_audit, quotations, user_favorites};
use crate::utils::{format_lower_bound, format_timestamp, price_sort_key};

type FilteredQuotations<'a> =
    IntoBoxed<'a, InnerJoin<quotations::table, currencies::table>, Sqlite>;

/// Quotations joined to their currency with every present predicate applied.
/// Price bounds compare fixed-width sort keys, so they are exact.
fn filtered_query<'a>(filter: &QuotationFilter, user_id: Option<i32>) -> FilteredQuotations<'a> {
    let mut query = quotations::table.inner_join(currencies::table).into_boxed();

    if let Some(needle) = &filter.name_contains {
        query = query.filter(currencies::name.like(format!("%{}%", needle)));
    }
    if let Some(min) = &filter.min_price {
        query = query.filter(quotations::price_key.ge(price_sort_key(min)));
    }
    if let Some(max) = &filter.max_price {
        query = query.filter(quotations::price_key.le(price_sort_key(max)));
    }
    if let Some(start) = &filter.start_date {
        query = query.filter(quotations::quoted_at.ge(format_lower_bound(start)));
    }
    if let Some(end) = &filter.end_date {
        query = query.filter(quotations::quoted_at.le(format_timestamp(end)));
    }
    if let Some(uid) = user_id {
        query = query.filter(
            quotations::currency_id.eq_any(
                user_favorites::table
                    .filter(user_favorites::user_id.eq(uid))
                    .select(user_favorites::currency_id),
            ),
        );
    }

    query
}

pub struct QuotationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl QuotationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl QuotationRepositoryTrait for QuotationRepository {
    fn get_by_id(&self, quotation_id: i32) -> Result<Option<Quotation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = quotations::table
            .find(quotation_id)
            .select(QuotationDB::as_select())
            .first::<QuotationDB>(&mut conn)
            .optional()
            .into_core()?;
        row.map(|r| Quotation::try_from(r).map_err(Error::from))
            .transpose()
    }

    fn find_latest_by_currency_name(&self, name: &str) -> Result<Option<Quotation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = quotations::table
            .inner_join(currencies::table)
            .filter(currencies::name.eq(name))
            .order((quotations::quoted_at.desc(), quotations::id.desc()))
            .select(QuotationDB::as_select())
            .first::<QuotationDB>(&mut conn)
            .optional()
            .into_core()?;
        row.map(|r| Quotation::try_from(r).map_err(Error::from))
            .transpose()
    }

    fn list_all(&self) -> Result<Vec<Quotation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = quotations::table
            .order(quotations::id.asc())
            .select(QuotationDB::as_select())
            .load::<QuotationDB>(&mut conn)
            .into_core()?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match Quotation::try_from(row) {
                    Ok(quotation) => Some(quotation),
                    Err(e) => {
                        warn!("Skipping quotation {}: {}", id, e);
                        None
                    }
                }
            })
            .collect())
    }

    fn search(
        &self,
        filter: &QuotationFilter,
        user_id: Option<i32>,
        pagination: Option<&Pagination>,
    ) -> Result<Vec<QuotationWithCurrency>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = filtered_query(filter, user_id)
            .select((QuotationDB::as_select(), currencies::name))
            .order(quotations::id.asc());
        if let Some(page) = pagination {
            query = query.limit(page.page_size).offset(page.offset());
        }

        let rows = query
            .load::<(QuotationDB, String)>(&mut conn)
            .into_core()?;

        rows.into_iter()
            .map(|(row, currency_name)| -> Result<QuotationWithCurrency> {
                Ok(QuotationWithCurrency {
                    quotation: Quotation::try_from(row)?,
                    currency_name,
                })
            })
            .collect()
    }

    fn count(&self, filter: &QuotationFilter, user_id: Option<i32>) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        filtered_query(filter, user_id)
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_quotation: NewQuotation) -> Result<Quotation> {
        let new_quotation_db = NewQuotationDB::from(new_quotation);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Quotation> {
                let row = diesel::insert_into(quotations::table)
                    .values(&new_quotation_db)
                    .returning(QuotationDB::as_returning())
                    .get_result::<QuotationDB>(conn)
                    .into_core()?;
                Ok(Quotation::try_from(row)?)
            })
            .await
    }

    async fn update(&self, quotation_id: i32, update: QuotationUpdate) -> Result<Quotation> {
        let price = update.price.to_string();
        let price_key = price_sort_key(&update.price);
        let quoted_at = update.timestamp.as_ref().map(format_timestamp);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Quotation> {
                let target = quotations::table.find(quotation_id);
                let row = match quoted_at {
                    Some(quoted_at) => diesel::update(target)
                        .set((
                            quotations::price.eq(price),
                            quotations::price_key.eq(price_key),
                            quotations::quoted_at.eq(quoted_at),
                        ))
                        .returning(QuotationDB::as_returning())
                        .get_result::<QuotationDB>(conn),
                    None => diesel::update(target)
                        .set((
                            quotations::price.eq(price),
                            quotations::price_key.eq(price_key),
                        ))
                        .returning(QuotationDB::as_returning())
                        .get_result::<QuotationDB>(conn),
                }
                .optional()
                .into_core()?
                .ok_or_else(|| Error::not_found("quotation", quotation_id))?;
                Ok(Quotation::try_from(row)?)
            })
            .await
    }

    async fn delete(&self, quotation_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(quotations::table.find(quotation_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn record_audit(&self, entry: AuditEntry) -> Result<()> {
        let entry_db = NewAuditEntryDB::from(entry);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(quotation_audit::table)
                    .values(&entry_db)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
