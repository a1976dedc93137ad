use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use coinquote_core::exports::ExportTask;
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartedExport {
    task_id: String,
}

fn csv_response(bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"quotes.csv\"",
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn export_csv(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let service = state.export_service.clone();
    let bytes = tokio::task::spawn_blocking(move || service.generate_csv())
        .await
        .map_err(|e| ApiError::Internal(format!("CSV export worker failed: {}", e)))??;
    Ok(csv_response(bytes))
}

async fn start_export(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<StartedExport>)> {
    let task_id = state.export_service.start_export()?;
    Ok((StatusCode::ACCEPTED, Json(StartedExport { task_id })))
}

async fn export_status(
    Path(task_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ExportTask>> {
    let status = state.export_service.export_status(&task_id).await?;
    Ok(Json(ExportTask { task_id, status }))
}

async fn export_file(
    Path(task_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let bytes = state.export_service.export_file(&task_id)?;
    Ok(csv_response(bytes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/exports", post(start_export))
        .route("/exports/csv", get(export_csv))
        .route("/exports/{task_id}/status", get(export_status))
        .route("/exports/{task_id}/file", get(export_file))
}
