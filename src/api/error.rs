// API Errors
// The single translation point from internal failures to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::params::ParamError;
use crate::store::QueryError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed path or query parameter
    #[error("{0}")]
    BadRequest(#[from] ParamError),

    /// Query ran fine but matched nothing
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Query(#[from] QueryError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every non-200 response
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            // Debug keeps the statement text that the body leaves out
            ApiError::Query(e) => tracing::error!(error = ?e, "catalog query failed"),
            ApiError::BadRequest(e) => tracing::debug!(error = %e, "rejected request parameters"),
            ApiError::NotFound(_) => {}
        }
        let body = Json(MessageBody {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
