//! [`AppError`]: the one error type handlers and services return

use super::codes::ErrorCode;
use http::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error code, message and optional structured context
///
/// The message defaults to [`ErrorCode::message`]. `details` carries
/// machine-readable context (offending field, order id, current status)
/// and is passed through to the response envelope unchanged.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one `details` entry; later keys overwrite earlier ones
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn is_system(&self) -> bool {
        self.code.category() == super::ErrorCategory::System
    }

    // ---- general ----

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    // ---- session ----

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    // ---- orders ----

    pub fn order_not_found(order_id: impl Into<String>) -> Self {
        Self::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id.into())
    }

    /// Edit-lock refusal, reporting the status that caused it
    pub fn order_not_editable(order_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self::new(ErrorCode::OrderNotEditable)
            .with_detail("order_id", order_id.into())
            .with_detail("status", status.into())
    }

    // ---- editor ----

    pub fn upload_not_found(upload_id: u64) -> Self {
        Self::new(ErrorCode::UploadNotFound).with_detail("upload_id", upload_id)
    }

    // ---- system ----

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }
}

/// Result alias used across the workspace
pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.is_system() {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        let status = self.http_status();
        (status, axum::Json(super::ApiResponse::<()>::from(self))).into_response()
    }
}
