//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports over the Open-Meteo clients and
//! provides configuration loading, tracing setup and retry policy.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, CacheConfig, Environment, ServerConfig, WeatherAppConfig};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
