use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::fmt;

use crate::{
    services::{employee_store::EmployeeStoreError, file_store::FileStoreError},
    validation::FieldError,
};

/// A lightweight wrapper for handler errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Extra JSON merged into the response body, used by validation
    /// rejections to echo the offending fields and submitted values.
    pub details: Option<Value>,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            details: None,
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// 422 for a rejected form, carrying the failing fields and what the
    /// client submitted so it can re-render the form.
    pub fn validation(fields: &[FieldError], submitted: Value) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "validation failed".into(),
            details: Some(json!({
                "fields": fields,
                "submitted": submitted,
            })),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message,
            "status": self.status.as_u16()
        });
        if let (Value::Object(base), Some(Value::Object(extra))) = (&mut body, self.details) {
            base.extend(extra);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<EmployeeStoreError> for AppError {
    fn from(err: EmployeeStoreError) -> Self {
        match err {
            EmployeeStoreError::NotFound(_) => AppError::not_found(err.to_string()),
            EmployeeStoreError::Sqlx(_) => AppError::internal(err.to_string()),
        }
    }
}

impl From<FileStoreError> for AppError {
    fn from(err: FileStoreError) -> Self {
        AppError::internal(format!("attachment storage: {err}"))
    }
}
