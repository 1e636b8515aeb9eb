//! Unified error handling for the API.
//!
//! Every handler returns [`AppError`]; its `IntoResponse` impl turns domain
//! failures into structured JSON bodies with the right status code. Field
//! validation failures name the offending field so clients can surface them
//! inline.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A field on the request failed validation.
    #[error("validation failed on {field}: {message}")]
    Validation {
        /// Dotted path of the offending field, e.g. `items[0].price_per_unit`.
        field: String,
        /// Human-readable rule that was violated.
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{field} references missing id {id}")]
    MissingReference {
        /// The field holding the dangling reference.
        field: String,
        /// The id that could not be resolved.
        id: i32,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage-level constraint violation (e.g. duplicate SKU).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convenience constructor for a field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("resource".to_string()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::MissingReference { field, id } => Self::MissingReference {
                field: field.to_string(),
                id,
            },
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }

        let (status, body) = match self {
            Self::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "validation_error",
                    field: Some(field),
                    message,
                },
            ),
            Self::MissingReference { field, id } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "missing_reference",
                    field: Some(field),
                    message: format!("referenced id {id} does not exist"),
                },
            ),
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not_found",
                    field: None,
                    message: format!("{what} not found"),
                },
            ),
            Self::Conflict(message) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: "conflict",
                    field: None,
                    message,
                },
            ),
            // Don't expose internal error details to clients
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "internal_error",
                    field: None,
                    message: "internal server error".to_string(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
