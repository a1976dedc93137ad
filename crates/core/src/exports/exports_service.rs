use async_trait::async_trait;
use log::{debug, error, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use super::exports_model::{ExportConfig, ExportStatus};
use super::exports_store::{ExportTaskStore, TaskPoll};
use super::exports_traits::ExportServiceTrait;
use crate::constants::CSV_HEADER;
use crate::currencies::CurrencyRepositoryTrait;
use crate::errors::{Error, Result};
use crate::quotations::QuotationRepositoryTrait;

/// Writes one row per currency with its latest price.
///
/// A currency without quotations, or whose latest quotation cannot be read,
/// is written with a price of `0.00`; failing to list currencies fails the
/// whole export.
pub fn generate_csv(
    currencies: &dyn CurrencyRepositoryTrait,
    quotations: &dyn QuotationRepositoryTrait,
) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for currency in currencies.list()? {
        let price = match quotations.find_latest_by_currency_name(&currency.name) {
            Ok(Some(quotation)) => quotation.price,
            Ok(None) => {
                warn!("No quotation for {}, exporting 0.00", currency.name);
                Decimal::ZERO
            }
            Err(e) => {
                warn!(
                    "Failed to read latest quotation for {}, exporting 0.00: {}",
                    currency.name, e
                );
                Decimal::ZERO
            }
        };
        writer.write_record([
            currency.id.to_string(),
            currency.name,
            currency.code,
            format_price(price),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::from(csv::Error::from(e.into_error())))
}

fn format_price(price: Decimal) -> String {
    format!(
        "{:.2}",
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[derive(Clone)]
struct CsvExporter {
    currencies: Arc<dyn CurrencyRepositoryTrait>,
    quotations: Arc<dyn QuotationRepositoryTrait>,
}

impl CsvExporter {
    fn generate(&self) -> Result<Vec<u8>> {
        generate_csv(self.currencies.as_ref(), self.quotations.as_ref())
    }
}

/// CSV export service. Background exports run on the blocking pool and report
/// through the shared [`ExportTaskStore`].
pub struct ExportService {
    exporter: CsvExporter,
    store: Arc<ExportTaskStore>,
    config: ExportConfig,
}

impl ExportService {
    pub fn new(
        currency_repository: Arc<dyn CurrencyRepositoryTrait>,
        quotation_repository: Arc<dyn QuotationRepositoryTrait>,
        store: Arc<ExportTaskStore>,
        config: ExportConfig,
    ) -> Self {
        Self {
            exporter: CsvExporter {
                currencies: currency_repository,
                quotations: quotation_repository,
            },
            store,
            config,
        }
    }
}

async fn wait_until_finished(
    task_id: &str,
    signal: &mut watch::Receiver<ExportStatus>,
) -> ExportStatus {
    match signal.wait_for(ExportStatus::is_terminal).await {
        Ok(status) => *status,
        Err(_) => {
            warn!("Export task {} stopped without reporting a result", task_id);
            ExportStatus::Failed
        }
    }
}

#[async_trait]
impl ExportServiceTrait for ExportService {
    fn generate_csv(&self) -> Result<Vec<u8>> {
        self.exporter.generate()
    }

    fn start_export(&self) -> Result<String> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Unexpected(format!("no async runtime for export: {}", e)))?;

        let evicted = self.evict_expired();
        if evicted > 0 {
            debug!("Evicted {} expired export tasks", evicted);
        }

        let task_id = Uuid::now_v7().to_string();
        let completion = self.store.register(&task_id);
        let exporter = self.exporter.clone();
        let store = self.store.clone();

        runtime.spawn(async move {
            let result = match tokio::task::spawn_blocking(move || exporter.generate()).await {
                Ok(result) => result,
                Err(e) => Err(Error::Unexpected(format!("export worker stopped: {}", e))),
            };
            if let Err(e) = &result {
                error!("Export task {} failed: {}", completion.task_id(), e);
            }
            let task_id = completion.task_id().to_string();
            let status = store.complete(completion, result);
            info!("Export task {} finished: {}", task_id, status);
        });

        info!("Started export task {}", task_id);
        Ok(task_id)
    }

    async fn export_status(&self, task_id: &str) -> Result<ExportStatus> {
        let mut signal = match self.store.poll(task_id)? {
            TaskPoll::Finished(status) => return Ok(status),
            TaskPoll::Pending(signal) => signal,
        };

        match self.config.status_wait_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, wait_until_finished(task_id, &mut signal)).await
                {
                    Ok(status) => Ok(status),
                    Err(_) => {
                        debug!("Export task {} still running after {:?}", task_id, limit);
                        Ok(ExportStatus::InProgress)
                    }
                }
            }
            None => Ok(wait_until_finished(task_id, &mut signal).await),
        }
    }

    fn export_file(&self, task_id: &str) -> Result<Vec<u8>> {
        self.store.file(task_id)
    }

    fn evict_expired(&self) -> usize {
        self.store.evict_expired(self.config.ttl)
    }
}
