//! Error types for the todo server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use todo_core::error::{ErrorEnvelope, CODE_BAD_REQUEST, CODE_INTERNAL};
use todo_core::ValidationError;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Failure of a procedure call, rendered as the JSON error envelope.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The request could not be parsed into the procedure's input type.
    #[error("{0}")]
    BadInput(String),

    /// The input parsed but broke a schema rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store failed while running the procedure.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::BadInput(_) | RpcError::Validation(_) => StatusCode::BAD_REQUEST,
            RpcError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            RpcError::BadInput(_) | RpcError::Validation(_) => CODE_BAD_REQUEST,
            RpcError::Database(_) => CODE_INTERNAL,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope::new(self.code(), self.to_string());
        (self.status(), Json(envelope)).into_response()
    }
}
