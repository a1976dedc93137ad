use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coinquote_core::errors::{DatabaseError, Error as CoreError, ExportError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

const INTERNAL_MESSAGE: &str = "Internal server error";

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
        CoreError::Export(ExportError::TaskNotFound(_))
        | CoreError::Export(ExportError::FileNotReady { .. }) => StatusCode::NOT_FOUND,
        CoreError::Export(ExportError::Csv(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::Database(DatabaseError::UniqueViolation(_))
        | CoreError::Database(DatabaseError::ForeignKeyViolation(_)) => StatusCode::CONFLICT,
        CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::MarketData(_) => StatusCode::BAD_GATEWAY,
        CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => {
                let status = core_status(e);
                if let CoreError::MarketData(upstream) = e {
                    tracing::warn!(
                        provider = upstream.provider().unwrap_or("unknown"),
                        "Upstream quote request failed: {}",
                        upstream
                    );
                }
                if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
                    // Storage details stay in the log.
                    tracing::error!("Request failed: {}", e);
                    (status, INTERNAL_MESSAGE.to_string())
                } else {
                    (status, e.to_string())
                }
            }
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
            ApiError::Internal(reason) => {
                tracing::error!("Request failed: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
