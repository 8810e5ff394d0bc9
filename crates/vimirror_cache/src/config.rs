//! Result cache timing configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use vimirror_error::ConfigError;

/// Configuration for the result cache.
///
/// # Example
///
/// ```
/// use vimirror_cache::CacheConfig;
///
/// let config = CacheConfig::default().with_cache_timeout(3600);
/// assert_eq!(*config.cache_timeout(), 3600);
/// assert_eq!(*config.max_age(), 30 * 24 * 3600);
/// assert!(config.validate().is_ok());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct CacheConfig {
    /// Seconds after which an entry is refetched (default 24 hours)
    #[serde(default = "default_cache_timeout")]
    cache_timeout: u64,

    /// Seconds after which an entry is deleted (default 30 days)
    #[serde(default = "default_max_age")]
    max_age: u64,
}

fn default_cache_timeout() -> u64 {
    24 * 60 * 60
}

fn default_max_age() -> u64 {
    30 * 24 * 60 * 60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_timeout: default_cache_timeout(),
            max_age: default_max_age(),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config builder.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Entries must become stale before they are deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or `max_age` does not exceed it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_timeout == 0 {
            return Err(ConfigError::new("cache timeout must be positive"));
        }
        if self.max_age <= self.cache_timeout {
            return Err(ConfigError::new(format!(
                "cache max age ({}s) must exceed cache timeout ({}s)",
                self.max_age, self.cache_timeout
            )));
        }
        Ok(())
    }
}
