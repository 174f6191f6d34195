//! Namespaced Cache - a TTL-bounded cache repository fronting Redis
//!
//! Keys are namespaced as `environment:functionalArea:key`, TTLs default to two
//! hours and never exceed four, and values go through a pluggable serializer.
//! A repository that cannot reach its store degrades to an always-empty cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod serializer;
pub mod store;

pub use api::AppState;
pub use cache::CacheRepository;
pub use config::{CacheSettings, Config};
pub use error::{CacheError, SerializerError, StoreError};
pub use logger::{Log, TracingLog};
pub use serializer::{CacheType, JsonSerializer, Serializer};
