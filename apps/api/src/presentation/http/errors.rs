//! HTTP error handling and response conversion.
//!
//! Handler failures are mapped to a status code and a `{"detail": ...}` JSON
//! body, the shape the browser client reads its error popup from.

use crate::domain::drawing::errors::DrawingError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Submitted drawing could not be used (400).
    InvalidInput(String),

    /// Request body is not a well-formed submission (422).
    Unprocessable(String),

    /// Unknown route (404).
    NotFound(String),

    /// Drawing analysis failed (500).
    Processing(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Unprocessable(msg) => write!(f, "Unprocessable request: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Processing(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `detail` field of the response body.
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidInput(msg)
            | Self::Unprocessable(msg)
            | Self::NotFound(msg)
            | Self::Processing(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("error={}", self);
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::warn!("error={}", self);
            }
            _ => {
                tracing::info!("error={}", self);
            }
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

// === Domain Error Conversion ===

impl From<DrawingError> for AppError {
    fn from(err: DrawingError) -> Self {
        if err.is_client_error() {
            AppError::InvalidInput(err.to_string())
        } else {
            AppError::Processing(err.to_string())
        }
    }
}

// === Body Extraction Error Conversion ===

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(json_rejection = %rejection);
        AppError::Unprocessable(rejection.body_text())
    }
}
