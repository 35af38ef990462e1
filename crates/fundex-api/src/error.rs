//! API error type
//!
//! Every handler failure maps to a status code and a JSON body of the form
//! `{ code, message, details, timestamp }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use fundex_core::LoadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed filter or sort parameters (400 Bad Request)
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// The catalog source failed during an explicit refresh (502 Bad Gateway)
    #[error("Upstream catalog error: {source}")]
    Upstream {
        #[from]
        source: LoadError,
    },

    /// No snapshot has been published yet (503 Service Unavailable)
    #[error("Catalog unavailable: {message}")]
    CatalogUnavailable { message: String },

    /// Internal server errors (500 Internal Server Error)
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ApiError::Validation { message: message.into(), field: field.map(str::to_string) }
    }

    pub fn not_loaded() -> Self {
        ApiError::CatalogUnavailable {
            message: "the fund catalog has not been loaded yet".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::CatalogUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Upstream { .. } => "UPSTREAM_ERROR",
            ApiError::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ApiErrorResponse {
        let mut details = serde_json::Map::new();
        match self {
            ApiError::Validation { field: Some(field), .. } => {
                details.insert("field".to_string(), serde_json::Value::String(field.clone()));
            }
            ApiError::Upstream { source } => {
                details.insert(
                    "category".to_string(),
                    serde_json::Value::String(source.category().to_string()),
                );
                if let Some(status) = source.status() {
                    details.insert("upstream_status".to_string(), status.into());
                }
            }
            _ => {}
        }

        ApiErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: if details.is_empty() { None } else { Some(serde_json::Value::Object(details)) },
            timestamp: Utc::now(),
        }
    }
}

/// JSON-serializable error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "Request failed");
        } else {
            warn!(code = self.error_code(), error = %self, "Request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
