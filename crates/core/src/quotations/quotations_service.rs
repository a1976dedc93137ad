use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use coinquote_market_data::ProviderRegistry;

use super::quotations_model::{
    NewQuotation, Pagination, Quotation, QuotationFilter, QuotationQueryResult, QuotationSeries,
    QuotationSummary, QuotationUpdate,
};
use super::quotations_traits::{QuotationRepositoryTrait, QuotationServiceTrait};
use crate::constants::DEFAULT_FIAT;
use crate::currencies::CurrencyRepositoryTrait;
use crate::errors::{Error, Result};

/// Service for storing, querying and ingesting quotations
pub struct QuotationService {
    repository: Arc<dyn QuotationRepositoryTrait>,
    currency_repository: Arc<dyn CurrencyRepositoryTrait>,
    providers: Arc<ProviderRegistry>,
}

impl QuotationService {
    pub fn new(
        repository: Arc<dyn QuotationRepositoryTrait>,
        currency_repository: Arc<dyn CurrencyRepositoryTrait>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            repository,
            currency_repository,
            providers,
        }
    }

    fn ensure_currency(&self, currency_id: i32) -> Result<()> {
        self.currency_repository
            .get_by_id(currency_id)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found("currency", currency_id))
    }
}

#[async_trait]
impl QuotationServiceTrait for QuotationService {
    fn query(
        &self,
        filter: &QuotationFilter,
        pagination: &Pagination,
        user_id: Option<i32>,
    ) -> Result<QuotationQueryResult> {
        pagination.validate()?;

        if filter.has_empty_price_range() {
            debug!("Quotation query with min price above max price, returning nothing");
            return Ok(QuotationQueryResult {
                quotations: Vec::new(),
                summary: QuotationSummary {
                    total_results: 0,
                    page_number: pagination.page_number,
                    page_size: pagination.page_size,
                    series: user_id.map(|_| QuotationSeries::default()),
                },
            });
        }

        let quotations = self.repository.search(filter, user_id, Some(pagination))?;
        let total_results = self.repository.count(filter, user_id)?;

        // Per-user series cover the whole filtered set, not just this page.
        let series = match user_id {
            Some(_) => {
                let all_rows = self.repository.search(filter, user_id, None)?;
                Some(QuotationSeries::from_rows(&all_rows))
            }
            None => None,
        };

        Ok(QuotationQueryResult {
            quotations,
            summary: QuotationSummary {
                total_results,
                page_number: pagination.page_number,
                page_size: pagination.page_size,
                series,
            },
        })
    }

    fn find_latest(&self, currency_name: &str) -> Result<Option<Quotation>> {
        self.repository.find_latest_by_currency_name(currency_name)
    }

    fn find_all(&self) -> Result<Vec<Quotation>> {
        self.repository.list_all()
    }

    fn get_quotation(&self, quotation_id: i32) -> Result<Quotation> {
        self.repository
            .get_by_id(quotation_id)?
            .ok_or_else(|| Error::not_found("quotation", quotation_id))
    }

    async fn save_quotation(&self, new_quotation: NewQuotation) -> Result<Quotation> {
        new_quotation.validate()?;
        self.ensure_currency(new_quotation.currency_id)?;
        self.repository.create(new_quotation).await
    }

    async fn update_quotation(
        &self,
        quotation_id: i32,
        update: QuotationUpdate,
    ) -> Result<Quotation> {
        update.validate()?;
        self.get_quotation(quotation_id)?;
        self.repository.update(quotation_id, update).await
    }

    async fn fetch_external_quote(
        &self,
        currency_name: &str,
        provider: &str,
        fiat: &str,
    ) -> Result<NewQuotation> {
        let quote_provider = self.providers.get(provider)?;
        let currency = self
            .currency_repository
            .get_by_name(currency_name)?
            .ok_or_else(|| Error::not_found("currency", currency_name))?;

        let quote = quote_provider
            .get_external_quote(&currency.name, &currency.code, fiat)
            .await?;
        debug!(
            "{} quoted {} at {} {}",
            quote.source, currency.name, quote.price, quote.fiat
        );

        Ok(NewQuotation {
            currency_id: currency.id,
            price: quote.price,
            timestamp: quote.timestamp,
            is_manual: false,
            user_id: None,
        })
    }

    async fn save_external_quotation(
        &self,
        currency_name: &str,
        provider: &str,
    ) -> Result<Quotation> {
        let new_quotation = self
            .fetch_external_quote(currency_name, provider, DEFAULT_FIAT)
            .await?;
        self.save_quotation(new_quotation).await
    }
}
