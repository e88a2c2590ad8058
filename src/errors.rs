use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::BookingStatus;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("booking draft is missing a schedule or an address")]
    IncompleteDraft,

    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("remote service error: {0}")]
    Remote(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::IncompleteDraft => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidTransition { .. } | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Remote(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl AppError {
    /// Wraps a failed remote call, keeping the whole context chain.
    pub fn remote(err: anyhow::Error) -> Self {
        AppError::Remote(format!("{err:#}"))
    }
}
