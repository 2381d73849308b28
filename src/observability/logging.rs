//! # Structured Logging
//!
//! Subscriber setup built on the tracing ecosystem.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ObservabilityConfig};
use crate::errors::{Error, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set. Fails if a subscriber
/// is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            Error::config(format!("Invalid log level '{}': {}", config.log_level, e))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logging {
        registry.with(fmt::layer().json().with_target(true).with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| Error::config(format!("Failed to install tracing subscriber: {}", e)))
}

/// Log configuration at startup
pub fn log_config_info(config: &Config) {
    tracing::info!(
        environment = %config.environment,
        api_address = %config.api.socket_address(),
        session_store = ?config.session.store,
        cookie_secure = config.session.cookie_secure,
        session_ttl_hours = config.session.ttl_hours,
        metrics_port = config.observability.metrics_port,
        "Linkshelf configuration"
    );
}
