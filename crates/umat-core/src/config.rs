//! Toolkit configuration
//!
//! Loaded from TOML; every section and key is optional and falls back to
//! [`Default`].
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.org"
//! timeout_secs = 15
//!
//! [cache]
//! enabled = true
//! max_capacity = 10000
//! ttl_secs = 600
//!
//! [log]
//! filter = "info"
//! json = false
//! ```

use crate::error::{AdminError, AdminResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Backend API
    pub api: ApiConfig,
    /// Location cache
    pub cache: CacheConfig,
    /// Logging
    pub log: LogConfig,
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/locations/..` endpoints hang off
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    /// Per-request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Location cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Wrap the HTTP source in a read-through cache
    pub enabled: bool,
    /// Maximum entries per cache table
    pub max_capacity: u64,
    /// Entry lifetime in seconds; 0 keeps entries until evicted
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_capacity: 10_000,
            ttl_secs: 600,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime, `None` when entries do not expire
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl AdminConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    /// [`AdminError::ConfigParse`] for malformed TOML, [`AdminError::Config`]
    /// for values that fail [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> AdminResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`AdminError::ConfigIo`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> AdminResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AdminError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check values that deserialize fine but cannot work
    ///
    /// # Errors
    /// [`AdminError::Config`] naming the offending key.
    pub fn validate(&self) -> AdminResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AdminError::config("api.base_url must not be empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AdminError::config("api.timeout_secs must be positive"));
        }
        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(AdminError::config(
                "cache.max_capacity must be positive when the cache is enabled",
            ));
        }
        Ok(())
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.api.timeout_secs = secs;
        self
    }

    /// With cache switched on or off
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    /// With cache capacity and lifetime
    #[inline]
    #[must_use]
    pub fn with_cache_limits(mut self, max_capacity: u64, ttl_secs: u64) -> Self {
        self.cache.max_capacity = max_capacity;
        self.cache.ttl_secs = ttl_secs;
        self
    }

    /// With log filter directives
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log.filter = filter.into();
        self
    }

    /// With JSON log output
    #[inline]
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.log.json = json;
        self
    }
}
