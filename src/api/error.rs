use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::domain::ValidationError;
use crate::storage::StorageError;

use super::response::ErrorResponse;

/// Errors surfaced by the HTTP handlers. Every error ends the request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("forbidden")]
    Forbidden,

    #[error("Application with ID {0} not found")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => ApiError::NotFound(id),
            other => ApiError::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::single("body", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(ValidationError::single("id", rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(err) => ErrorResponse::validation(err.fields),
            ApiError::Forbidden => ErrorResponse::forbidden(),
            ApiError::NotFound(id) => {
                ErrorResponse::not_found(format!("Application with ID {id} not found"))
            }
            ApiError::Storage(err) => {
                error!(error = %err, "Storage failure");
                ErrorResponse::internal_error()
            }
        };

        (status, Json(body)).into_response()
    }
}
