//! # Configuration Management
//!
//! Environment-driven configuration for the Linkshelf service. Every section has
//! a `from_env` constructor with defaults; [`Config::validate`] runs the
//! `validator` rules plus cross-field checks.

pub mod settings;

pub use settings::{
    ApiServerConfig, DatabaseConfig, DeploymentEnvironment, MetadataConfig, ObservabilityConfig,
    SessionConfig, SessionStoreBackend,
};

use validator::Validate;

use crate::errors::{Error, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Validate)]
pub struct Config {
    /// Deployment environment, decides production-only behaviour
    pub environment: DeploymentEnvironment,

    #[validate(nested)]
    pub api: ApiServerConfig,

    #[validate(nested)]
    pub session: SessionConfig,

    #[validate(nested)]
    pub database: DatabaseConfig,

    #[validate(nested)]
    pub metadata: MetadataConfig,

    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = DeploymentEnvironment::from_env()?;

        let config = Self {
            environment,
            api: ApiServerConfig::from_env()?,
            session: SessionConfig::from_env(environment)?,
            database: DatabaseConfig::from_env()?,
            metadata: MetadataConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        if self.observability.metrics_port != 0 && self.observability.metrics_port == self.api.port
        {
            return Err(Error::validation("API and metrics ports cannot be the same"));
        }

        if self.session.store == SessionStoreBackend::Sqlite && !self.database.is_sqlite() {
            return Err(Error::validation_field(
                "Database URL must start with 'sqlite:' when the sqlite session store is selected",
                "database.url",
            ));
        }

        Ok(())
    }
}

/// Parse a boolean flag the way operators usually write them
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
