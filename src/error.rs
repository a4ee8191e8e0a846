//! Error types for the application layer
//!
//! The caches and the resource tracker never fail; these errors come from the
//! ranking backend and from request validation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == App Error Enum ==
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested key is not cached
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The ranking backend failed or answered with an error status
    #[error("Backend error: {0}")]
    Backend(String),

    /// The backend did not answer before the fetch was cancelled
    #[error("Backend timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::Backend(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));
        (self.status(), body).into_response()
    }
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, AppError>;
