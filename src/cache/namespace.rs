//! Namespace Module
//!
//! Builds the store-visible key `environment:functionalArea:key`.

use std::fmt;

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Delimiter between the namespace components and the caller key.
pub const SEPARATOR: char = ':';

/// Environment used when none is configured
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// Functional area used when none is configured
pub const DEFAULT_FUNCTIONAL_AREA: &str = "default";

// == Namespace ==
/// Environment and functional area under which all keys of a repository live.
///
/// Neither component may be blank or contain [`SEPARATOR`]. The caller key is the
/// last component, so it may contain the separator without blurring the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    environment: String,
    functional_area: String,
}

impl Namespace {
    pub fn new(environment: impl Into<String>, functional_area: impl Into<String>) -> Result<Self> {
        let environment = environment.into();
        let functional_area = functional_area.into();

        validate_component("environment", &environment)?;
        validate_component("functional area", &functional_area)?;

        Ok(Self {
            environment,
            functional_area,
        })
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn functional_area(&self) -> &str {
        &self.functional_area
    }

    // == Key ==
    /// Namespaces a caller key. Blank keys are rejected.
    pub fn key(&self, key: &str) -> Result<String> {
        ensure_key(key)?;
        Ok(format!(
            "{}{sep}{}{sep}{}",
            self.environment,
            self.functional_area,
            key,
            sep = SEPARATOR
        ))
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            functional_area: DEFAULT_FUNCTIONAL_AREA.to_string(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.environment, SEPARATOR, self.functional_area)
    }
}

/// Rejects blank caller keys.
pub fn ensure_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(CacheError::InvalidArgument("key cannot be blank".to_string()));
    }
    Ok(())
}

fn validate_component(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CacheError::InvalidArgument(format!("{} cannot be blank", name)));
    }
    if value.contains(SEPARATOR) {
        return Err(CacheError::InvalidArgument(format!(
            "{} '{}' must not contain '{}'",
            name, value, SEPARATOR
        )));
    }
    Ok(())
}
