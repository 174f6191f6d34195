//! Store Entry Module
//!
//! A single value held by the in-process store, with its expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Store Entry ==
/// Represents a single stored value with TTL metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored (already encoded) value
    pub value: String,
    /// TTL the entry was written with
    pub ttl: Duration,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    pub fn new(value: String, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            value,
            ttl,
            expires_at: current_timestamp_ms().saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
