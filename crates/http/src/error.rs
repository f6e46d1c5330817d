//! Error handling for the bookshelf HTTP layer

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

/// Header carrying the id that ties an error response to its log line
pub const ERROR_ID_HEADER: &str = "x-error-id";

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation { details: Vec<Value>, message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            message: message.into(),
        }
    }

    /// Validation error for a single offending input location.
    ///
    /// `loc` names where the input came from, e.g. `["body"]` or `["path", "id"]`.
    pub fn invalid_input(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        let msg = msg.into();
        Self::validation(
            vec![json!({ "loc": loc, "msg": msg, "type": kind })],
            msg,
        )
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        let detail = match self {
            AppError::Validation { details, message } => {
                tracing::warn!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    %message,
                    "request rejected"
                );
                Value::Array(details)
            }
            AppError::NotFound { message } | AppError::BadRequest { message } => {
                tracing::info!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    %message,
                    "request failed"
                );
                Value::String(message)
            }
            AppError::Internal(e) => {
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    error = ?e,
                    "request error"
                );
                // Hide internal error details outside debug builds
                if cfg!(debug_assertions) {
                    Value::String(format!("{:#}", e))
                } else {
                    Value::String("Internal Server Error".to_string())
                }
            }
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if let Ok(value) = HeaderValue::from_str(&error_id.to_string()) {
            response.headers_mut().insert(ERROR_ID_HEADER, value);
        }
        response
    }
}

pub type AppResult<T> = Result<T, AppError>;
