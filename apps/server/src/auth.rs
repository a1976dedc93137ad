use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::main_lib::AppState;

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return None;
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

/// Rejects requests whose bearer token does not match the configured API token.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    match bearer_token(&request) {
        Some(token) if token == state.api_token => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Rejected request with an invalid API token");
            Err(ApiError::Unauthorized("Invalid API token".to_string()))
        }
        None => Err(ApiError::Unauthorized(
            "Missing bearer token".to_string(),
        )),
    }
}
