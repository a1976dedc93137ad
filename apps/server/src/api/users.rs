use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use coinquote_core::currencies::Currency;
use coinquote_core::quotations::QuotationQueryResult;
use coinquote_core::users::{NewUser, UpsertUser, User, UserPatch};
use serde::Deserialize;

use super::quotations::QuotationParams;
use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    #[serde(flatten)]
    user: NewUser,
    #[serde(default)]
    favorite_codes: Vec<String>,
}

#[derive(Deserialize)]
struct FavoriteNameQuery {
    name: String,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .user_service
        .create_user(payload.user, payload.favorite_codes)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn upsert_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpsertUser>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.upsert_user(payload).await?;
    Ok(Json(user))
}

async fn get_user(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(id)?;
    Ok(Json(user))
}

async fn update_user(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.update_user(id, payload).await?;
    Ok(Json(user))
}

async fn patch_user(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserPatch>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.patch_user(id, payload).await?;
    Ok(Json(user))
}

async fn favorite_currency_ids(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<i32>>> {
    let ids = state.user_service.favorite_currency_ids(id)?;
    Ok(Json(ids))
}

async fn replace_favorites(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(codes): Json<Vec<String>>,
) -> ApiResult<Json<Vec<i32>>> {
    let ids = state.user_service.replace_favorites(id, codes).await?;
    Ok(Json(ids))
}

async fn add_favorite_by_name(
    Path(id): Path<i32>,
    Query(query): Query<FavoriteNameQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Currency>> {
    let currency = state
        .user_service
        .add_favorite_by_name(id, &query.name)
        .await?;
    Ok(Json(currency))
}

async fn user_quotations(
    Path(id): Path<i32>,
    Query(params): Query<QuotationParams>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<QuotationQueryResult>> {
    let (filter, pagination) = params.into_query()?;
    state.user_service.get_user(id)?;
    let result = state
        .quotation_service
        .query(&filter, &pagination, Some(id))?;
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/upsert", post(upsert_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).patch(patch_user),
        )
        .route("/users/{id}/currencies", get(favorite_currency_ids))
        .route(
            "/users/{id}/favorites",
            post(add_favorite_by_name).put(replace_favorites),
        )
        .route("/users/{id}/quotations", get(user_quotations))
}
