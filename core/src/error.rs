//! Error types for the todo client.
//!
//! # Design
//! A missing todo is not an error here: `getTodo` and `updateTodo` answer
//! `null` and the client surfaces that as `Ok(None)`. Errors are reserved for
//! rejected input, server-side failures and payloads that do not parse.

use serde::{Deserialize, Serialize};

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the input before running the procedure (400).
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The server answered with any other non-200 status.
    #[error("HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Error envelope produced by the server: `{"error":{"code":..,"message":..}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Error codes carried in the envelope.
pub const CODE_BAD_REQUEST: &str = "BAD_REQUEST";
pub const CODE_INTERNAL: &str = "INTERNAL_SERVER_ERROR";
