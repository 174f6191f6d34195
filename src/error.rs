//! Error types for the cache repository
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors surfaced to callers of the cache repository.
///
/// Connectivity failures never appear here: a repository that cannot reach its
/// store is constructed inactive instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller misuse, such as a blank key or an invalid namespace component
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Value could not be encoded or decoded
    #[error(transparent)]
    Serialization(#[from] SerializerError),

    /// Store rejected or failed a command
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == Serializer Error Enum ==
/// Failures raised by a [`crate::serializer::Serializer`].
#[derive(Error, Debug)]
pub enum SerializerError {
    /// Value could not be turned into text
    #[error("Failed to encode value: {0}")]
    Encode(String),

    /// Text could not be turned back into a value
    #[error("Failed to decode value: {0}")]
    Decode(String),

    /// Stored type tag does not match the requested type
    #[error("Type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    /// Envelope is structurally invalid
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

// == Store Error Enum ==
/// Failures raised by a [`crate::store::KeyValueStore`] or its connector.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection descriptor could not be parsed
    #[error("Invalid connection descriptor: {0}")]
    InvalidDescriptor(String),

    /// Connection could not be established
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Connection was not established within the connect timeout
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// Command failed on an established connection
    #[error("Store command failed: {0}")]
    Command(#[from] redis::RedisError),

    /// Store is not usable (e.g. a poisoned in-process store)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache repository.
pub type Result<T> = std::result::Result<T, CacheError>;
