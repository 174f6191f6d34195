//! TTL Policy Module
//!
//! Resolves the per-call TTL: `requested` or the default, clamped to the maximum.

use std::time::Duration;

// == Public Constants ==
/// TTL applied when the caller does not supply one
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Upper bound on any TTL written to the store
pub const MAX_TTL: Duration = Duration::from_secs(4 * 60 * 60);

// == TTL Policy ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    default_ttl: Duration,
    max_ttl: Duration,
}

impl TtlPolicy {
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn max_ttl(&self) -> Duration {
        self.max_ttl
    }

    // == Resolve ==
    /// Effective TTL for a write: `min(requested ?? default, max)`.
    pub fn resolve(&self, requested: Option<Duration>) -> Duration {
        requested.unwrap_or(self.default_ttl).min(self.max_ttl)
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            max_ttl: MAX_TTL,
        }
    }
}
