//! Cache Module
//!
//! The cache repository with its key namespacing and TTL policy.

mod namespace;
mod repository;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use namespace::{ensure_key, Namespace, DEFAULT_ENVIRONMENT, DEFAULT_FUNCTIONAL_AREA, SEPARATOR};
pub use repository::CacheRepository;
pub use ttl::{TtlPolicy, DEFAULT_TTL, MAX_TTL};
