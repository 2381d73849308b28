//! # Configuration Settings
//!
//! Section structs for [`super::Config`]. Each `from_env` reads the process
//! environment; `from_vars` takes an explicit lookup so tests never have to
//! mutate global state.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::parse_flag;
use crate::errors::{Error, Result};

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse `key` when set; a value that is present but malformed is an error
fn parse_or<T>(vars: &dyn Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match vars(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::config(format!("Invalid value '{}' for {}: {}", raw, key, e))),
        None => Ok(default),
    }
}

fn flag_or(vars: &dyn Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    match vars(key) {
        Some(raw) => parse_flag(&raw)
            .ok_or_else(|| Error::validation_field(format!("Invalid boolean '{}'", raw), key)),
        None => Ok(default),
    }
}

/// Where the service is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnvironment {
    Production,
    Staging,
    #[default]
    Development,
    Test,
}

impl DeploymentEnvironment {
    /// Read `LINKSHELF_ENV` (default `development`)
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&env_lookup)
    }

    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        match vars("LINKSHELF_ENV") {
            Some(raw) if !raw.trim().is_empty() => raw.parse(),
            _ => Ok(Self::default()),
        }
    }

    /// Production and staging serve real users over HTTPS
    pub fn is_production_like(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

impl FromStr for DeploymentEnvironment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            other => Err(Error::validation_field(
                format!("Unknown deployment environment '{}'", other),
                "LINKSHELF_ENV",
            )),
        }
    }
}

impl fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Test => "test",
        };
        f.write_str(name)
    }
}

/// HTTP API server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Bind address cannot be empty"))]
    pub bind_address: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Origins allowed to make credentialed cross-origin requests (empty = CORS off)
    pub cors_origins: Vec<String>,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0".to_string(), port: 8080, cors_origins: vec![] }
    }
}

impl ApiServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&env_lookup)
    }

    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = parse_or(vars, "LINKSHELF_API_PORT", defaults.port)?;

        let bind_address = vars("LINKSHELF_API_BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let cors_origins = vars("LINKSHELF_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { bind_address, port, cors_origins })
    }

    /// Get the server bind address
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Which session store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for SessionStoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(Error::validation_field(
                format!("Unknown session store '{}'", other),
                "LINKSHELF_SESSION_STORE",
            )),
        }
    }
}

/// Session lifetime and cookie policy
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,

    /// Lifetime of newly issued sessions
    #[validate(range(min = 1, max = 720, message = "Session TTL must be between 1 and 720 hours"))]
    pub ttl_hours: i64,

    /// How often expired sessions are purged
    #[validate(range(
        min = 1,
        max = 86400,
        message = "Cleanup interval must be between 1 second and 1 day"
    ))]
    pub cleanup_interval_seconds: u64,

    pub store: SessionStoreBackend,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_environment(DeploymentEnvironment::default())
    }
}

impl SessionConfig {
    /// Defaults for an environment; `Secure` follows production-likeness
    pub fn for_environment(environment: DeploymentEnvironment) -> Self {
        Self {
            cookie_secure: environment.is_production_like(),
            ttl_hours: 24,
            cleanup_interval_seconds: 300,
            store: SessionStoreBackend::default(),
        }
    }

    pub fn from_env(environment: DeploymentEnvironment) -> Result<Self> {
        Self::from_vars(environment, &env_lookup)
    }

    pub fn from_vars(
        environment: DeploymentEnvironment,
        vars: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = Self::for_environment(environment);

        let cookie_secure = flag_or(vars, "LINKSHELF_COOKIE_SECURE", defaults.cookie_secure)?;

        let store = match vars("LINKSHELF_SESSION_STORE") {
            Some(raw) => raw.parse()?,
            None => defaults.store,
        };

        Ok(Self {
            cookie_secure,
            ttl_hours: parse_or(vars, "LINKSHELF_SESSION_TTL_HOURS", defaults.ttl_hours)?,
            cleanup_interval_seconds: parse_or(
                vars,
                "LINKSHELF_SESSION_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            )?,
            store,
        })
    }

    /// Session lifetime as a chrono duration
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Pool acquire timeout; bounds every session store call
    #[validate(range(
        min = 1,
        max = 60,
        message = "Connect timeout must be between 1 and 60 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Run embedded migrations on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/linkshelf.db".to_string(),
            max_connections: 10,
            connect_timeout_seconds: 5,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Create DatabaseConfig from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&env_lookup)
    }

    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            url: vars("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: parse_or(vars, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            connect_timeout_seconds: parse_or(
                vars,
                "DATABASE_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout_seconds,
            )?,
            auto_migrate: flag_or(vars, "DATABASE_AUTO_MIGRATE", defaults.auto_migrate)?,
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Check if this is a SQLite configuration
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }

    /// Check if this points at a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Outbound URL metadata fetching
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MetadataConfig {
    #[validate(range(min = 1, max = 120, message = "Fetch timeout must be between 1 and 120 seconds"))]
    pub timeout_seconds: u64,

    #[validate(length(min = 1, message = "User agent cannot be empty"))]
    pub user_agent: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
        }
    }
}

impl MetadataConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&env_lookup)
    }

    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            timeout_seconds: parse_or(
                vars,
                "LINKSHELF_METADATA_TIMEOUT_SECONDS",
                defaults.timeout_seconds,
            )?,
            user_agent: vars("LINKSHELF_METADATA_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Logging and metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Service name attached to metrics
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error) used when RUST_LOG is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Prometheus exporter port (0 = disabled)
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: crate::APP_NAME.to_string(),
            log_level: "info".to_string(),
            json_logging: false,
            metrics_port: 0,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&env_lookup)
    }

    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            service_name: vars("LINKSHELF_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: vars("LINKSHELF_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logging: flag_or(vars, "LINKSHELF_LOG_JSON", defaults.json_logging)?,
            metrics_port: parse_or(vars, "LINKSHELF_METRICS_PORT", defaults.metrics_port)?,
        })
    }

    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}
