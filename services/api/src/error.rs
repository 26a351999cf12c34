//! Error type for the API service
//!
//! Every failure a handler can report collapses into one of three
//! categories, each with a fixed HTTP status and the same JSON envelope.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Internal, validation or persistence failure
    #[error("{0}")]
    Server(String),

    /// Authentication or credential failure
    #[error("{0}")]
    Unauthorized(String),

    /// Missing resource
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Generic server error that does not leak internals
    pub fn internal() -> Self {
        ApiError::Server("Internal server error".to_string())
    }

    /// The single unauthorized error used for every credential failure
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn not_found() -> Self {
        ApiError::NotFound("Not Found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Server(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Server(rejection.body_text())
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
