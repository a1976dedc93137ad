use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use coinquote_core::errors::Error as CoreError;
use coinquote_core::quotations::{
    NewQuotation, Pagination, Quotation, QuotationFilter, QuotationQueryResult, QuotationUpdate,
};
use coinquote_core::users::ManualQuotation;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

/// Filter and paging parameters shared by the quotation query endpoints.
#[derive(Debug, Default, Deserialize)]
pub(super) struct QuotationParams {
    name: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    page_size: Option<i64>,
    page_number: Option<i64>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(value: &Option<String>) -> Result<Option<Decimal>, CoreError> {
    present(value)
        .map(Decimal::from_str)
        .transpose()
        .map_err(CoreError::from)
}

fn parse_date(value: &Option<String>) -> Result<Option<DateTime<Utc>>, CoreError> {
    present(value)
        .map(|v| DateTime::parse_from_rfc3339(v).map(|dt| dt.with_timezone(&Utc)))
        .transpose()
        .map_err(CoreError::from)
}

impl QuotationParams {
    /// Malformed prices or dates are validation errors. Missing or
    /// non-positive paging values fall back to the defaults.
    pub(super) fn into_query(self) -> Result<(QuotationFilter, Pagination), CoreError> {
        let filter = QuotationFilter {
            name_contains: present(&self.name).map(str::to_string),
            min_price: parse_price(&self.min_price)?,
            max_price: parse_price(&self.max_price)?,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
        };
        let pagination = Pagination::from_params(self.page_size, self.page_number);
        Ok((filter, pagination))
    }
}

#[derive(Deserialize)]
struct ExternalQuoteQuery {
    name: String,
    provider: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualOwner {
    user_id: i32,
}

async fn query_quotations(
    Query(params): Query<QuotationParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<QuotationQueryResult>> {
    let (filter, pagination) = params.into_query()?;
    let result = state.quotation_service.query(&filter, &pagination, None)?;
    Ok(Json(result))
}

async fn list_all_quotations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Quotation>>> {
    let quotations = state.quotation_service.find_all()?;
    Ok(Json(quotations))
}

async fn get_quotation(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Quotation>> {
    let quotation = state.quotation_service.get_quotation(id)?;
    Ok(Json(quotation))
}

async fn latest_quotation(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Quotation>> {
    let quotation = state
        .quotation_service
        .find_latest(&name)?
        .ok_or_else(|| CoreError::not_found("quotation for currency", &name))?;
    Ok(Json(quotation))
}

async fn save_quotation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewQuotation>,
) -> ApiResult<(StatusCode, Json<Quotation>)> {
    let quotation = state.quotation_service.save_quotation(payload).await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

async fn update_quotation(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuotationUpdate>,
) -> ApiResult<Json<Quotation>> {
    let quotation = state.quotation_service.update_quotation(id, payload).await?;
    Ok(Json(quotation))
}

async fn save_external_quotation(
    Query(query): Query<ExternalQuoteQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<Quotation>)> {
    let quotation = state
        .quotation_service
        .save_external_quotation(&query.name, &query.provider)
        .await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

async fn save_manual_quotation(
    Query(owner): Query<ManualOwner>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ManualQuotation>,
) -> ApiResult<(StatusCode, Json<Quotation>)> {
    let quotation = state
        .user_service
        .save_manual_quotation(owner.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

async fn update_manual_quotation(
    Path((user_id, quotation_id)): Path<(i32, i32)>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuotationUpdate>,
) -> ApiResult<Json<Quotation>> {
    let quotation = state
        .user_service
        .update_manual_quotation(user_id, quotation_id, payload)
        .await?;
    Ok(Json(quotation))
}

async fn delete_manual_quotation(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.user_service.delete_manual_quotation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotations", get(query_quotations))
        .route("/quotations/all", get(list_all_quotations))
        .route(
            "/quotations/{id}",
            get(get_quotation).put(update_quotation),
        )
        .route("/quotations/latest/{name}", get(latest_quotation))
        .route("/quotations/manual", post(save_manual_quotation))
        .route(
            "/quotations/manual/{user_id}/{quotation_id}",
            put(update_manual_quotation),
        )
        .route("/quotations/manual/{id}", delete(delete_manual_quotation))
}

/// Routes that require the API token.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotations", post(save_quotation))
        .route("/quotations/external", post(save_external_quotation))
}
