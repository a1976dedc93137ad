use std::sync::Arc;

use crate::config::Config;
use coinquote_core::{
    currencies::{CurrencyService, CurrencyServiceTrait},
    exports::{ExportConfig, ExportService, ExportServiceTrait, ExportTaskStore},
    quotations::{QuotationService, QuotationServiceTrait},
    users::{UserService, UserServiceTrait},
};
use coinquote_market_data::ProviderRegistry;
use coinquote_storage_sqlite::{
    currencies::CurrencyRepository,
    db::{self, write_actor},
    quotations::QuotationRepository,
    users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub currency_service: Arc<dyn CurrencyServiceTrait>,
    pub quotation_service: Arc<dyn QuotationServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub export_service: Arc<dyn ExportServiceTrait>,
    pub api_token: String,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_providers(config, ProviderRegistry::new()).await
}

/// Same as [`build_state`] with a caller-supplied set of quote providers.
pub async fn build_state_with_providers(
    config: &Config,
    providers: ProviderRegistry,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let currency_repository = Arc::new(CurrencyRepository::new(pool.clone(), writer.clone()));
    let quotation_repository = Arc::new(QuotationRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer));

    let quotation_service: Arc<dyn QuotationServiceTrait> = Arc::new(QuotationService::new(
        quotation_repository.clone(),
        currency_repository.clone(),
        Arc::new(providers),
    ));
    let currency_service: Arc<dyn CurrencyServiceTrait> = Arc::new(CurrencyService::new(
        currency_repository.clone(),
        quotation_service.clone(),
    ));
    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(
        user_repository,
        currency_repository.clone(),
        quotation_repository.clone(),
    ));
    let export_service: Arc<dyn ExportServiceTrait> = Arc::new(ExportService::new(
        currency_repository,
        quotation_repository,
        Arc::new(ExportTaskStore::new()),
        ExportConfig {
            ttl: config.export_ttl,
            status_wait_timeout: config.export_wait_timeout,
        },
    ));

    Ok(Arc::new(AppState {
        currency_service,
        quotation_service,
        user_service,
        export_service,
        api_token: config.api_token.clone(),
    }))
}
