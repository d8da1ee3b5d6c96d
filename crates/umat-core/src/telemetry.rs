//! Tracing subscriber setup

use crate::config::LogConfig;
use crate::error::{AdminError, AdminResult};
use tracing_subscriber::EnvFilter;

/// Build the filter for a log configuration
///
/// # Errors
/// [`AdminError::Telemetry`] if `filter` has invalid directives.
pub fn env_filter(config: &LogConfig) -> AdminResult<EnvFilter> {
    EnvFilter::try_new(&config.filter)
        .map_err(|e| AdminError::Telemetry(format!("invalid log filter '{}': {e}", config.filter)))
}

/// Install the global fmt subscriber
///
/// `RUST_LOG` takes precedence over `config.filter`.
///
/// # Errors
/// [`AdminError::Telemetry`] if the filter is invalid or a global subscriber
/// is already installed.
pub fn init_tracing(config: &LogConfig) -> AdminResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => env_filter(config)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| AdminError::Telemetry(e.to_string()))?;
    tracing::debug!(json = config.json, "tracing initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_filters_parse() {
        let config = LogConfig {
            filter: "info,umat_location=debug".into(),
            json: false,
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn invalid_filters_are_rejected() {
        let config = LogConfig {
            filter: "umat_location=loudest".into(),
            json: false,
        };
        assert!(matches!(env_filter(&config), Err(AdminError::Telemetry(_))));
    }

    #[test]
    fn second_install_fails_instead_of_panicking() {
        let config = LogConfig::default();
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(AdminError::Telemetry(_))));
    }
}
