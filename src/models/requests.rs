//! Request DTOs for the cache gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Request body for PUT /set and POST /add
///
/// # Fields
/// - `key`: The caller key, namespaced by the repository
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (default TTL if omitted or zero, clamped to the maximum)
#[derive(Debug, Clone, Deserialize)]
pub struct WriteRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl WriteRequest {
    /// Requested TTL as a duration. Zero means "use the default".
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl.filter(|&secs| secs > 0).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: WriteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, Value::String("hello".to_string()));
        assert!(req.ttl().is_none());
    }

    #[test]
    fn test_write_request_with_ttl_and_object_value() {
        let json = r#"{"key": "test", "value": {"id": 7}, "ttl": 60}"#;
        let req: WriteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl(), Some(Duration::from_secs(60)));
        assert_eq!(req.value["id"], 7);
    }

    #[test]
    fn test_zero_ttl_falls_back_to_default() {
        let json = r#"{"key": "test", "value": 1, "ttl": 0}"#;
        let req: WriteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl(), None);
    }

    #[test]
    fn test_write_request_requires_value() {
        let json = r#"{"key": "test"}"#;
        assert!(serde_json::from_str::<WriteRequest>(json).is_err());
    }
}
