//! Response DTOs for the cache gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The cached value
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /set
///
/// The write is dispatched without waiting for the store, so success here
/// means "accepted", not "stored".
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' accepted", key),
            key,
        }
    }
}

/// Response body for POST /add
#[derive(Debug, Clone, Serialize)]
pub struct AddResponse {
    pub key: String,
    /// Whether a new entry was created
    pub created: bool,
}

impl AddResponse {
    pub fn new(key: impl Into<String>, created: bool) -> Self {
        Self {
            key: key.into(),
            created,
        }
    }
}

/// Response body for DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' removal dispatched", key),
            key,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the store is connected, "degraded" otherwise
    pub status: String,
    /// Whether the repository holds a store connection
    pub active: bool,
    pub environment: String,
    pub functional_area: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(
        active: bool,
        environment: impl Into<String>,
        functional_area: impl Into<String>,
    ) -> Self {
        Self {
            status: if active { "healthy" } else { "degraded" }.to_string(),
            active,
            environment: environment.into(),
            functional_area: functional_area.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
