use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::assistant::model::ModelError;

/// Domain failures surfaced by the handlers. Login and registration errors
/// are usually recovered in-handler and re-rendered as form errors; the
/// variants that escape map onto HTTP statuses below.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("user already exists")]
    DuplicateName,
    #[error("user not found")]
    UserNotFound,
    #[error("incorrect password")]
    InvalidCredential,
    #[error("authentication required")]
    Unauthenticated,
    #[error("task not found")]
    TaskNotFound,
    #[error("assistant unavailable: {0}")]
    ModelUnavailable(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<ModelError> for AppError {
    fn from(e: ModelError) -> Self {
        AppError::ModelUnavailable(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::DuplicateName => StatusCode::CONFLICT,
            AppError::UserNotFound | AppError::TaskNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredential | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(e) => {
                error!(error = %e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
