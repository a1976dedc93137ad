use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use coinquote_core::currencies::{Currency, NewCurrency};
use coinquote_core::quotations::Quotation;
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct CurrencyNameUpdate {
    name: String,
}

#[derive(Deserialize)]
struct ExternalCurrencyQuery {
    name: String,
    code: String,
    provider: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredCurrency {
    currency: Currency,
    quotation: Quotation,
}

async fn list_currencies(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Currency>>> {
    let currencies = state.currency_service.list_currencies()?;
    Ok(Json(currencies))
}

async fn get_currency(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Currency>> {
    let currency = state.currency_service.get_currency(id)?;
    Ok(Json(currency))
}

async fn get_currency_by_name(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Currency>> {
    let currency = state.currency_service.get_currency_by_name(&name)?;
    Ok(Json(currency))
}

async fn update_currency_name(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CurrencyNameUpdate>,
) -> ApiResult<Json<Currency>> {
    let currency = state
        .currency_service
        .update_currency_name(id, payload.name)
        .await?;
    Ok(Json(currency))
}

async fn register_currency(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCurrency>,
) -> ApiResult<(StatusCode, Json<Currency>)> {
    let currency = state.currency_service.register_currency(payload).await?;
    Ok((StatusCode::CREATED, Json(currency)))
}

async fn register_with_external_quote(
    Query(query): Query<ExternalCurrencyQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<RegisteredCurrency>)> {
    let (currency, quotation) = state
        .currency_service
        .register_with_external_quote(NewCurrency::new(query.name, query.code), &query.provider)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredCurrency {
            currency,
            quotation,
        }),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currencies", get(list_currencies))
        .route(
            "/currencies/{id}",
            get(get_currency).put(update_currency_name),
        )
        .route("/currencies/by-name/{name}", get(get_currency_by_name))
}

/// Routes that require the API token.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currencies", post(register_currency))
        .route("/currencies/external", post(register_with_external_quote))
}
