use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::currencies_model::{Currency, NewCurrency};
use super::currencies_traits::{CurrencyRepositoryTrait, CurrencyServiceTrait};
use crate::constants::DEFAULT_FIAT;
use crate::errors::{Error, Result, ValidationError};
use crate::quotations::{Quotation, QuotationServiceTrait};

/// Service for managing currencies
pub struct CurrencyService {
    repository: Arc<dyn CurrencyRepositoryTrait>,
    quotation_service: Arc<dyn QuotationServiceTrait>,
}

impl CurrencyService {
    pub fn new(
        repository: Arc<dyn CurrencyRepositoryTrait>,
        quotation_service: Arc<dyn QuotationServiceTrait>,
    ) -> Self {
        Self {
            repository,
            quotation_service,
        }
    }

    fn ensure_unique(&self, new_currency: &NewCurrency) -> Result<()> {
        if self.repository.get_by_name(&new_currency.name)?.is_some() {
            return Err(Error::ConstraintViolation(format!(
                "currency '{}' already exists",
                new_currency.name
            )));
        }
        if self.repository.get_by_code(&new_currency.code)?.is_some() {
            return Err(Error::ConstraintViolation(format!(
                "currency code '{}' already exists",
                new_currency.code
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CurrencyServiceTrait for CurrencyService {
    fn get_currency(&self, currency_id: i32) -> Result<Currency> {
        self.repository
            .get_by_id(currency_id)?
            .ok_or_else(|| Error::not_found("currency", currency_id))
    }

    fn get_currency_by_name(&self, name: &str) -> Result<Currency> {
        self.repository
            .get_by_name(name)?
            .ok_or_else(|| Error::not_found("currency", name))
    }

    fn list_currencies(&self) -> Result<Vec<Currency>> {
        self.repository.list()
    }

    async fn register_currency(&self, new_currency: NewCurrency) -> Result<Currency> {
        new_currency.validate()?;
        let new_currency = new_currency.normalized();
        self.ensure_unique(&new_currency)?;
        debug!("Registering currency {} ({})", new_currency.name, new_currency.code);
        self.repository.create(new_currency).await
    }

    async fn update_currency_name(&self, currency_id: i32, name: String) -> Result<Currency> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        self.get_currency(currency_id)?;
        if let Some(existing) = self.repository.get_by_name(&name)? {
            if existing.id != currency_id {
                return Err(Error::ConstraintViolation(format!(
                    "currency '{}' already exists",
                    name
                )));
            }
        }
        self.repository.update_name(currency_id, name).await
    }

    async fn register_with_external_quote(
        &self,
        new_currency: NewCurrency,
        provider: &str,
    ) -> Result<(Currency, Quotation)> {
        let currency = self.register_currency(new_currency).await?;
        let new_quotation = self
            .quotation_service
            .fetch_external_quote(&currency.name, provider, DEFAULT_FIAT)
            .await?;
        let quotation = self.quotation_service.save_quotation(new_quotation).await?;
        info!(
            "Registered {} with a {} quote of {} from {}",
            currency.name, DEFAULT_FIAT, quotation.price, provider
        );
        Ok((currency, quotation))
    }
}
