//! Configuration Module
//!
//! Cache settings (namespace and connection string) and the gateway configuration,
//! loaded from environment variables.

use std::env;
use std::fmt;

use crate::cache::{Namespace, DEFAULT_ENVIRONMENT, DEFAULT_FUNCTIONAL_AREA};
use crate::error::Result;

// == Cache Settings ==
/// Settings used to construct a [`crate::cache::CacheRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    namespace: Namespace,
    connection_string: String,
}

impl CacheSettings {
    /// Validates the namespace components. An empty connection string is allowed
    /// and yields an inactive repository.
    pub fn new(
        environment: impl Into<String>,
        functional_area: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            namespace: Namespace::new(environment, functional_area)?,
            connection_string: connection_string.into(),
        })
    }

    /// Loads settings from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENVIRONMENT` - Environment component of every key (default: local)
    /// - `CACHE_FUNCTIONAL_AREA` - Functional-area component (default: default)
    /// - `CACHE_CONNECTION_STRING` - Store connection string (default: empty, cache disabled)
    pub fn from_env() -> Result<Self> {
        Self::new(
            env::var("CACHE_ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string()),
            env::var("CACHE_FUNCTIONAL_AREA")
                .unwrap_or_else(|_| DEFAULT_FUNCTIONAL_AREA.to_string()),
            env::var("CACHE_CONNECTION_STRING").unwrap_or_default(),
        )
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn environment(&self) -> &str {
        self.namespace.environment()
    }

    pub fn functional_area(&self) -> &str {
        self.namespace.functional_area()
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl fmt::Display for CacheSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Env:{} Area:{}",
            self.environment(),
            self.functional_area()
        )
    }
}

// == Gateway Config ==
/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings for the fronted cache repository
    pub cache: CacheSettings,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Loads the cache settings plus `SERVER_PORT` (default: 3000).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            cache: CacheSettings::from_env()?,
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheSettings {
                namespace: Namespace::default(),
                connection_string: String::new(),
            },
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache.environment(), "local");
        assert_eq!(config.cache.functional_area(), "default");
        assert!(config.cache.connection_string().is_empty());
    }

    #[test]
    fn test_settings_display() {
        let settings = CacheSettings::new(
            "integration-test-environment",
            "cache-testing",
            "localhost,abortConnect=false",
        )
        .unwrap();
        assert_eq!(
            settings.to_string(),
            "Env:integration-test-environment Area:cache-testing"
        );
    }

    #[test]
    fn test_settings_reject_separator_in_namespace() {
        assert!(CacheSettings::new("prod:eu", "users", "").is_err());
    }

    #[test]
    fn test_settings_from_env_defaults() {
        env::remove_var("CACHE_ENVIRONMENT");
        env::remove_var("CACHE_FUNCTIONAL_AREA");
        env::remove_var("CACHE_CONNECTION_STRING");

        let settings = CacheSettings::from_env().unwrap();
        assert_eq!(settings.environment(), "local");
        assert_eq!(settings.functional_area(), "default");
        assert_eq!(settings.connection_string(), "");
    }
}
