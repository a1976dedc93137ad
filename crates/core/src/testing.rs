//! In-memory repositories and providers shared by service tests.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coinquote_market_data::{ExternalQuote, MarketDataError, QuoteProvider};

use crate::currencies::{Currency, CurrencyRepositoryTrait, NewCurrency};
use crate::errors::{DatabaseError, Error, Result};
use crate::quotations::{
    AuditEntry, NewQuotation, Pagination, Quotation, QuotationFilter, QuotationRepositoryTrait,
    QuotationUpdate, QuotationWithCurrency,
};
use crate::users::{NewUser, User, UserPatch, UserRepositoryTrait};

#[derive(Default)]
pub struct StoreData {
    pub currencies: Vec<Currency>,
    pub quotations: Vec<Quotation>,
    pub users: Vec<User>,
    pub favorites: Vec<(i32, i32)>,
    pub audits: Vec<AuditEntry>,
    pub fail_latest_for: Option<String>,
    pub fail_list_currencies: bool,
    pub fail_audit: bool,
    pub list_delay: Option<Duration>,
    /// Number of `CurrencyRepositoryTrait::list` calls
    pub list_calls: usize,
}

/// One in-memory database backing every repository trait.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub data: Arc<Mutex<StoreData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_currency(&self, name: &str, code: &str) -> Currency {
        let mut data = self.data.lock().unwrap();
        let currency = Currency {
            id: data.currencies.len() as i32 + 1,
            name: name.to_string(),
            code: code.to_string(),
        };
        data.currencies.push(currency.clone());
        currency
    }

    pub fn add_quotation(&self, currency_id: i32, price: Decimal, minutes_ago: i64) -> Quotation {
        let mut data = self.data.lock().unwrap();
        let quotation = Quotation {
            id: data.quotations.len() as i32 + 1,
            currency_id,
            price,
            timestamp: Utc::now() - chrono::Duration::minutes(minutes_ago),
            is_manual: false,
            user_id: None,
        };
        data.quotations.push(quotation.clone());
        quotation
    }

    pub fn add_user(&self, user_code: &str) -> User {
        let mut data = self.data.lock().unwrap();
        let user = User {
            id: data.users.len() as i32 + 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            user_code: user_code.to_string(),
            email: format!("{}@example.com", user_code),
            document_type: crate::users::DocumentType::Dni,
            registered_at: Utc::now(),
            is_active: true,
        };
        data.users.push(user.clone());
        user
    }

    pub fn link_favorite(&self, user_id: i32, currency_id: i32) {
        self.data
            .lock()
            .unwrap()
            .favorites
            .push((user_id, currency_id));
    }

    pub fn audits(&self) -> Vec<AuditEntry> {
        self.data.lock().unwrap().audits.clone()
    }

    fn rows(&self, filter: &QuotationFilter, user_id: Option<i32>) -> Vec<QuotationWithCurrency> {
        let data = self.data.lock().unwrap();
        let mut rows: Vec<QuotationWithCurrency> = data
            .quotations
            .iter()
            .filter_map(|q| {
                let currency = data.currencies.iter().find(|c| c.id == q.currency_id)?;
                Some(QuotationWithCurrency {
                    quotation: q.clone(),
                    currency_name: currency.name.clone(),
                })
            })
            .filter(|row| match user_id {
                Some(uid) => data
                    .favorites
                    .contains(&(uid, row.quotation.currency_id)),
                None => true,
            })
            .filter(|row| filter.matches(row))
            .collect();
        rows.sort_by_key(|row| row.quotation.id);
        rows
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for InMemoryStore {
    fn get_by_id(&self, currency_id: i32) -> Result<Option<Currency>> {
        let data = self.data.lock().unwrap();
        Ok(data.currencies.iter().find(|c| c.id == currency_id).cloned())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Currency>> {
        let data = self.data.lock().unwrap();
        Ok(data.currencies.iter().find(|c| c.name == name).cloned())
    }

    fn get_by_code(&self, code: &str) -> Result<Option<Currency>> {
        let data = self.data.lock().unwrap();
        Ok(data.currencies.iter().find(|c| c.code == code).cloned())
    }

    fn list(&self) -> Result<Vec<Currency>> {
        let (delay, fail) = {
            let mut data = self.data.lock().unwrap();
            data.list_calls += 1;
            (data.list_delay, data.fail_list_currencies)
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        if fail {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "currencies table is locked".to_string(),
            )));
        }
        Ok(self.data.lock().unwrap().currencies.clone())
    }

    async fn create(&self, new_currency: NewCurrency) -> Result<Currency> {
        Ok(self.add_currency(&new_currency.name, &new_currency.code))
    }

    async fn update_name(&self, currency_id: i32, name: String) -> Result<Currency> {
        let mut data = self.data.lock().unwrap();
        let currency = data
            .currencies
            .iter_mut()
            .find(|c| c.id == currency_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound("currency".to_string())))?;
        currency.name = name;
        Ok(currency.clone())
    }
}

#[async_trait]
impl QuotationRepositoryTrait for InMemoryStore {
    fn get_by_id(&self, quotation_id: i32) -> Result<Option<Quotation>> {
        let data = self.data.lock().unwrap();
        Ok(data.quotations.iter().find(|q| q.id == quotation_id).cloned())
    }

    fn find_latest_by_currency_name(&self, name: &str) -> Result<Option<Quotation>> {
        let data = self.data.lock().unwrap();
        if data.fail_latest_for.as_deref() == Some(name) {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        let Some(currency) = data.currencies.iter().find(|c| c.name == name) else {
            return Ok(None);
        };
        Ok(data
            .quotations
            .iter()
            .filter(|q| q.currency_id == currency.id)
            .max_by_key(|q| q.timestamp)
            .cloned())
    }

    fn list_all(&self) -> Result<Vec<Quotation>> {
        Ok(self.data.lock().unwrap().quotations.clone())
    }

    fn search(
        &self,
        filter: &QuotationFilter,
        user_id: Option<i32>,
        pagination: Option<&Pagination>,
    ) -> Result<Vec<QuotationWithCurrency>> {
        let rows = self.rows(filter, user_id);
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
        Ok(self.rows(filter, user_id).len() as i64)
    }

    async fn create(&self, new_quotation: NewQuotation) -> Result<Quotation> {
        let mut data = self.data.lock().unwrap();
        let quotation = Quotation {
            id: data.quotations.len() as i32 + 1,
            currency_id: new_quotation.currency_id,
            price: new_quotation.price,
            timestamp: new_quotation.timestamp,
            is_manual: new_quotation.is_manual,
            user_id: new_quotation.user_id,
        };
        data.quotations.push(quotation.clone());
        Ok(quotation)
    }

    async fn update(&self, quotation_id: i32, update: QuotationUpdate) -> Result<Quotation> {
        let mut data = self.data.lock().unwrap();
        let quotation = data
            .quotations
            .iter_mut()
            .find(|q| q.id == quotation_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound("quotation".to_string())))?;
        quotation.price = update.price;
        if let Some(timestamp) = update.timestamp {
            quotation.timestamp = timestamp;
        }
        Ok(quotation.clone())
    }

    async fn delete(&self, quotation_id: i32) -> Result<usize> {
        let mut data = self.data.lock().unwrap();
        let before = data.quotations.len();
        data.quotations.retain(|q| q.id != quotation_id);
        Ok(before - data.quotations.len())
    }

    async fn record_audit(&self, entry: AuditEntry) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        if data.fail_audit {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "audit table missing".to_string(),
            )));
        }
        data.audits.push(entry);
        Ok(())
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryStore {
    fn get_by_id(&self, user_id: i32) -> Result<Option<User>> {
        let data = self.data.lock().unwrap();
        Ok(data.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn favorite_currency_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .favorites
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, cid)| *cid)
            .collect())
    }

    fn user_ids_for_currency(&self, currency_id: i32) -> Result<Vec<i32>> {
        let data = self.data.lock().unwrap();
        Ok(data
            .favorites
            .iter()
            .filter(|(_, cid)| *cid == currency_id)
            .map(|(uid, _)| *uid)
            .collect())
    }

    async fn create(&self, new_user: NewUser, favorite_currency_ids: Vec<i32>) -> Result<User> {
        let mut data = self.data.lock().unwrap();
        let user = User {
            id: data.users.len() as i32 + 1,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            birth_date: new_user.birth_date,
            user_code: new_user.user_code,
            email: new_user.email,
            document_type: new_user.document_type,
            registered_at: Utc::now(),
            is_active: new_user.is_active,
        };
        data.users.push(user.clone());
        for currency_id in favorite_currency_ids {
            data.favorites.push((user.id, currency_id));
        }
        Ok(user)
    }

    async fn update(&self, user_id: i32, user: NewUser) -> Result<User> {
        let mut data = self.data.lock().unwrap();
        let existing = data
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound("user".to_string())))?;
        existing.first_name = user.first_name;
        existing.last_name = user.last_name;
        existing.birth_date = user.birth_date;
        existing.user_code = user.user_code;
        existing.email = user.email;
        existing.document_type = user.document_type;
        existing.is_active = user.is_active;
        Ok(existing.clone())
    }

    async fn patch(
        &self,
        user_id: i32,
        patch: UserPatch,
        favorite_currency_ids: Option<Vec<i32>>,
    ) -> Result<User> {
        let mut data = self.data.lock().unwrap();
        let existing = data
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound("user".to_string())))?;
        if let Some(v) = patch.first_name {
            existing.first_name = v;
        }
        if let Some(v) = patch.last_name {
            existing.last_name = v;
        }
        if let Some(v) = patch.birth_date {
            existing.birth_date = v;
        }
        if let Some(v) = patch.email {
            existing.email = v;
        }
        if let Some(v) = patch.document_type {
            existing.document_type = v;
        }
        if let Some(v) = patch.is_active {
            existing.is_active = v;
        }
        let user = existing.clone();
        if let Some(ids) = favorite_currency_ids {
            data.favorites.retain(|(uid, _)| *uid != user_id);
            data.favorites.extend(ids.into_iter().map(|cid| (user_id, cid)));
        }
        Ok(user)
    }

    async fn add_favorite(&self, user_id: i32, currency_id: i32) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        if !data.favorites.contains(&(user_id, currency_id)) {
            data.favorites.push((user_id, currency_id));
        }
        Ok(())
    }

    async fn replace_favorites(&self, user_id: i32, currency_ids: Vec<i32>) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        data.favorites.retain(|(uid, _)| *uid != user_id);
        data.favorites
            .extend(currency_ids.into_iter().map(|cid| (user_id, cid)));
        Ok(())
    }
}

/// Provider that always answers with the same price.
pub struct FixedQuoteProvider {
    pub id: &'static str,
    pub price: Decimal,
}

#[async_trait]
impl QuoteProvider for FixedQuoteProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn get_external_quote(
        &self,
        _name: &str,
        _code: &str,
        fiat: &str,
    ) -> std::result::Result<ExternalQuote, MarketDataError> {
        Ok(ExternalQuote::now(self.price, fiat, self.id))
    }
}

/// Provider whose upstream is down.
pub struct FailingQuoteProvider;

#[async_trait]
impl QuoteProvider for FailingQuoteProvider {
    fn id(&self) -> &'static str {
        "failing"
    }

    async fn get_external_quote(
        &self,
        _name: &str,
        _code: &str,
        _fiat: &str,
    ) -> std::result::Result<ExternalQuote, MarketDataError> {
        Err(MarketDataError::ProviderError {
            provider: "failing".to_string(),
            message: "503 Service Unavailable".to_string(),
        })
    }
}
