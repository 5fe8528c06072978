//! Application error type and its HTTP mapping.
//!
//! Every failure surfaced to a caller goes through [`AppError`]. Each variant
//! maps to a stable status code and renders the same JSON shape:
//!
//! ```json
//! { "success": false, "message": "URL has expired" }
//! ```

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Errors produced by the registry, the resolver, the aggregator and the stores.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please provide a valid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid alias: {0}")]
    InvalidAlias(String),

    #[error("Custom alias already exists: {0}")]
    AliasTaken(String),

    #[error("URL not found")]
    NotFound,

    #[error("URL not found or inactive")]
    Inactive,

    #[error("URL has expired")]
    Expired,

    #[error("Failed to generate a unique short code")]
    GenerationExhausted,

    #[error("Storage unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl AppError {
    /// HTTP status associated with the error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_)
            | AppError::InvalidAlias(_)
            | AppError::AliasTaken(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::Inactive => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GenerationExhausted | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }

    /// Message exposed to clients. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) | AppError::GenerationExhausted => "Server error".to_string(),
            AppError::StoreUnavailable(_) => "Storage temporarily unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = ErrorBody {
            success: false,
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::StoreUnavailable(e.to_string())
            }
            other => AppError::Internal(format!("Database error: {}", other)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}
