use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use std::sync::Arc;

use super::users_model::{
    ensure_adult, FavoritesChange, ManualQuotation, NewUser, UpsertUser, User, UserPatch,
};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::constants::{
    AUDIT_QUOTATION_CREATED, AUDIT_QUOTATION_DELETED, AUDIT_QUOTATION_UPDATED,
};
use crate::currencies::{Currency, CurrencyRepositoryTrait, NewCurrency};
use crate::errors::{Error, Result, ValidationError};
use crate::quotations::{
    AuditEntry, NewQuotation, Quotation, QuotationRepositoryTrait, QuotationUpdate,
};

/// Service for users, their favorite currencies and their manual quotations
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    currency_repository: Arc<dyn CurrencyRepositoryTrait>,
    quotation_repository: Arc<dyn QuotationRepositoryTrait>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        currency_repository: Arc<dyn CurrencyRepositoryTrait>,
        quotation_repository: Arc<dyn QuotationRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            currency_repository,
            quotation_repository,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Resolves currency codes to ids. Unknown codes are an error.
    fn resolve_codes(&self, codes: &[String]) -> Result<Vec<i32>> {
        let mut ids = Vec::with_capacity(codes.len());
        for code in codes {
            let currency = self
                .currency_repository
                .get_by_code(code.trim())?
                .ok_or_else(|| Error::not_found("currency code", code))?;
            if !ids.contains(&currency.id) {
                ids.push(currency.id);
            }
        }
        Ok(ids)
    }

    /// Audit failures are logged and never fail the caller.
    async fn audit(&self, user_id: Option<i32>, quotation_id: i32, message: &str) {
        let entry = AuditEntry {
            user_id,
            quotation_id: Some(quotation_id),
            message: message.to_string(),
        };
        if let Err(e) = self.quotation_repository.record_audit(entry).await {
            warn!(
                "Failed to write audit entry '{}' for quotation {}: {}",
                message, quotation_id, e
            );
        }
    }

    fn manual_quotation(&self, quotation_id: i32) -> Result<Quotation> {
        let quotation = self
            .quotation_repository
            .get_by_id(quotation_id)?
            .ok_or_else(|| Error::not_found("quotation", quotation_id))?;
        if !quotation.is_manual {
            return Err(ValidationError::InvalidInput(format!(
                "quotation {} was not entered manually",
                quotation_id
            ))
            .into());
        }
        Ok(quotation)
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_user(&self, user_id: i32) -> Result<User> {
        self.repository
            .get_by_id(user_id)?
            .ok_or_else(|| Error::not_found("user", user_id))
    }

    fn favorite_currency_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        self.get_user(user_id)?;
        self.repository.favorite_currency_ids(user_id)
    }

    fn users_for_currency(&self, currency_id: i32) -> Result<Vec<i32>> {
        self.repository.user_ids_for_currency(currency_id)
    }

    async fn create_user(&self, new_user: NewUser, favorite_codes: Vec<String>) -> Result<User> {
        new_user.validate(Self::today())?;
        let favorite_ids = self.resolve_codes(&favorite_codes)?;
        debug!(
            "Creating user {} with {} favorites",
            new_user.user_code,
            favorite_ids.len()
        );
        self.repository.create(new_user, favorite_ids).await
    }

    async fn update_user(&self, user_id: i32, user: NewUser) -> Result<User> {
        user.validate(Self::today())?;
        self.get_user(user_id)?;
        self.repository.update(user_id, user).await
    }

    async fn patch_user(&self, user_id: i32, patch: UserPatch) -> Result<User> {
        if patch.is_empty() {
            return Err(ValidationError::InvalidInput("no updates provided".to_string()).into());
        }
        if let Some(birth_date) = patch.birth_date {
            ensure_adult(birth_date, Self::today())?;
        }
        self.get_user(user_id)?;

        let favorite_ids = match &patch.favorites {
            FavoritesChange::Keep => None,
            FavoritesChange::Clear => Some(Vec::new()),
            FavoritesChange::Replace(codes) => Some(self.resolve_codes(codes)?),
        };
        self.repository.patch(user_id, patch, favorite_ids).await
    }

    async fn upsert_user(&self, request: UpsertUser) -> Result<User> {
        let user = match request.id {
            Some(user_id) => self.update_user(user_id, request.user).await?,
            None => self.create_user(request.user, Vec::new()).await?,
        };
        for name in &request.favorite_names {
            self.add_favorite_by_name(user.id, name).await?;
        }
        Ok(user)
    }

    async fn replace_favorites(
        &self,
        user_id: i32,
        favorite_codes: Vec<String>,
    ) -> Result<Vec<i32>> {
        self.get_user(user_id)?;
        let ids = self.resolve_codes(&favorite_codes)?;
        self.repository
            .replace_favorites(user_id, ids.clone())
            .await?;
        Ok(ids)
    }

    async fn add_favorite_by_name(&self, user_id: i32, currency_name: &str) -> Result<Currency> {
        self.get_user(user_id)?;
        let currency = match self.currency_repository.get_by_name(currency_name.trim())? {
            Some(currency) => currency,
            None => {
                let new_currency = NewCurrency::from_name(currency_name);
                new_currency.validate()?;
                debug!("Registering currency {} as a favorite", new_currency.name);
                self.currency_repository.create(new_currency).await?
            }
        };
        self.repository.add_favorite(user_id, currency.id).await?;
        Ok(currency)
    }

    async fn save_manual_quotation(
        &self,
        user_id: i32,
        quotation: ManualQuotation,
    ) -> Result<Quotation> {
        self.get_user(user_id)?;
        if self
            .currency_repository
            .get_by_id(quotation.currency_id)?
            .is_none()
        {
            return Err(Error::not_found("currency", quotation.currency_id));
        }
        let new_quotation = NewQuotation {
            currency_id: quotation.currency_id,
            price: quotation.price,
            timestamp: quotation.timestamp.unwrap_or_else(Utc::now),
            is_manual: true,
            user_id: Some(user_id),
        };
        new_quotation.validate()?;

        let saved = self.quotation_repository.create(new_quotation).await?;
        self.audit(Some(user_id), saved.id, AUDIT_QUOTATION_CREATED)
            .await;
        Ok(saved)
    }

    async fn update_manual_quotation(
        &self,
        user_id: i32,
        quotation_id: i32,
        update: QuotationUpdate,
    ) -> Result<Quotation> {
        update.validate()?;
        self.get_user(user_id)?;
        self.manual_quotation(quotation_id)?;

        let updated = self.quotation_repository.update(quotation_id, update).await?;
        self.audit(Some(user_id), updated.id, AUDIT_QUOTATION_UPDATED)
            .await;
        Ok(updated)
    }

    async fn delete_manual_quotation(&self, quotation_id: i32) -> Result<()> {
        let quotation = self.manual_quotation(quotation_id)?;
        self.quotation_repository.delete(quotation_id).await?;
        self.audit(quotation.user_id, quotation_id, AUDIT_QUOTATION_DELETED)
            .await;
        Ok(())
    }
}
