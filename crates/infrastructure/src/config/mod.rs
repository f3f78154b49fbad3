//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `weather`: Open-Meteo forecast and geocoding clients
//! - `cache`: forecast response cache TTL
//!
//! Retry settings live in [`crate::retry::RetryConfig`].

mod cache;
mod server;
mod weather;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

pub use cache::CacheConfig;
pub use server::ServerConfig;
pub use weather::WeatherAppConfig;

/// Prefix of environment variable overrides, e.g. `WEATHER_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "WEATHER";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream API configuration
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Retry policy for upstream calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and environment
    ///
    /// Environment variables use the `WEATHER_` prefix and `__` between
    /// nested keys, e.g. `WEATHER_CACHE__TTL_SECS=300`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::builder(config::File::with_name("config").required(false))
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an explicit TOML file plus environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let file = config::File::from(path.as_ref()).format(config::FileFormat::Toml);
        Self::builder(file).build()?.try_deserialize()
    }

    fn builder<S>(file: S) -> config::ConfigBuilder<config::builder::DefaultState>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder().add_source(file).add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Whether the service runs in production mode
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
