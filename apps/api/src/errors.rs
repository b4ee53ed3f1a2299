use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing client input. `fields` names the offending inputs.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation is not legal at the interview's current lifecycle position.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A concurrent writer updated the record first.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The text generator failed or produced unusable output.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>, fields: &[&str]) -> Self {
        AppError::Validation {
            message: message.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::UnsupportedCapability(_)
            | AppError::Extraction(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut fields: Option<Vec<String>> = None;

        let (code, message) = match self {
            AppError::Validation {
                message,
                fields: invalid,
            } => {
                fields = Some(invalid);
                ("VALIDATION_ERROR", message)
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg),
            AppError::InvalidState(msg) => ("INVALID_STATE", msg),
            AppError::Conflict(msg) => {
                tracing::warn!("Write conflict: {msg}");
                ("CONFLICT", msg)
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                ("UPSTREAM_ERROR", msg)
            }
            AppError::UnsupportedCapability(msg) => {
                tracing::error!("Unsupported capability: {msg}");
                ("UNSUPPORTED_CAPABILITY", msg)
            }
            AppError::Extraction(msg) => {
                tracing::error!("Extraction error: {msg}");
                ("EXTRACTION_ERROR", msg)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
