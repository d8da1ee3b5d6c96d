//! Umat Admin Core
//!
//! Wiring for the location and permission crates: configuration loading,
//! tracing setup, the access context forms consult, and a constructor for the
//! location resolver the forms share.
//!
//! # Example
//!
//! ```rust,no_run
//! use umat_core::{build_location_resolver, telemetry, AdminConfig};
//!
//! # fn main() -> umat_core::AdminResult<()> {
//! let config = AdminConfig::load("umat.toml")?;
//! telemetry::init_tracing(&config.log)?;
//! let resolver = build_location_resolver(&config)?;
//! # let _ = resolver;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod access;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-exports for convenience
pub use access::{AccessContext, Area, AreaFilter, CurrentUser, UnknownArea};
pub use config::{AdminConfig, ApiConfig, CacheConfig, LogConfig};
pub use error::{AdminError, AdminResult};

use std::sync::Arc;
use umat_location::{CachedLocationSource, HttpLocationSource, LocationResolver, SharedSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the location source described by `config`
///
/// An HTTP source with the configured timeout, behind a read-through cache
/// when `cache.enabled` is set.
///
/// # Errors
/// [`AdminError::Config`] for invalid settings, [`AdminError::HttpClient`] if
/// the client cannot be built, [`AdminError::Source`] for an unusable base URL.
pub fn build_location_source(config: &AdminConfig) -> AdminResult<SharedSource> {
    config.validate()?;

    let client = reqwest::Client::builder()
        .timeout(config.api.timeout())
        .build()?;
    let http = HttpLocationSource::with_client(client, &config.api.base_url)?;

    if !config.cache.enabled {
        tracing::debug!(base_url = %http.base_url(), "location source without cache");
        return Ok(Arc::new(http));
    }

    let capacity = config.cache.max_capacity;
    let cached = match config.cache.ttl() {
        Some(ttl) => CachedLocationSource::with_ttl(http, capacity, ttl),
        None => CachedLocationSource::new(http, capacity),
    };
    tracing::debug!(
        base_url = %cached.inner().base_url(),
        capacity,
        ttl_secs = config.cache.ttl_secs,
        "location source with cache"
    );
    Ok(Arc::new(cached))
}

/// Build the shared location resolver described by `config`
///
/// # Errors
/// Same as [`build_location_source`].
pub fn build_location_resolver(
    config: &AdminConfig,
) -> AdminResult<LocationResolver<SharedSource>> {
    Ok(LocationResolver::new(build_location_source(config)?))
}
