//! Open-Meteo forecast client
//!
//! HTTP client for the Open-Meteo Forecast API. Requests a fixed set of
//! hourly or daily variables in unix time and returns them as a
//! [`SampleSet`] addressed by variable name.

use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeDelta;
use domain::SampleSet;
use domain::variables::{DAILY_VARIABLES, HOURLY_VARIABLES};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, SeriesBlock};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timed out
    #[error("Weather request timed out")]
    Timeout,

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl WeatherError {
    /// Whether retrying the same request may succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::Timeout
                | Self::ServiceUnavailable(_)
                | Self::RateLimitExceeded
        )
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of forecast days (1-16, default: 7)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

const fn default_forecast_days() -> u8 {
    7
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

/// Resolution of a forecast request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One sample per hour
    Hourly,
    /// One sample per day
    Daily,
}

impl Granularity {
    /// Query parameter / response block name
    pub const fn block(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }

    /// Variables requested at this resolution
    pub const fn variables(self) -> &'static [&'static str] {
        match self {
            Self::Hourly => &HOURLY_VARIABLES,
            Self::Daily => &DAILY_VARIABLES,
        }
    }

    /// Step assumed when the upstream returns a single point
    pub fn nominal_interval(self) -> TimeDelta {
        match self {
            Self::Hourly => TimeDelta::hours(1),
            Self::Daily => TimeDelta::days(1),
        }
    }
}

/// Weather client trait for fetching forecast samples
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch the hourly variables for a location
    async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<SampleSet, WeatherError>;

    /// Fetch the daily variables for a location
    async fn fetch_daily(&self, latitude: f64, longitude: f64) -> Result<SampleSet, WeatherError>;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Query parameters for a forecast request
    fn query(
        &self,
        latitude: f64,
        longitude: f64,
        granularity: Granularity,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            (granularity.block(), granularity.variables().join(",")),
            ("timeformat", "unixtime".to_string()),
            ("timezone", "GMT".to_string()),
            ("wind_speed_unit", "ms".to_string()),
            (
                "forecast_days",
                self.config.forecast_days.clamp(1, 16).to_string(),
            ),
        ]
    }

    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        granularity: Granularity,
    ) -> Result<SampleSet, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = format!("{}/forecast", self.config.base_url);
        debug!(url = %url, block = granularity.block(), "Fetching forecast");

        let response = self
            .client
            .get(&url)
            .query(&self.query(latitude, longitude, granularity))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Timeout
                } else {
                    WeatherError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;
        debug!(
            grid_lat = api_response.latitude,
            grid_lon = api_response.longitude,
            "Forecast received"
        );

        let block = Self::select_block(api_response, granularity)?;
        block
            .into_samples(granularity.variables(), granularity.nominal_interval())
            .map_err(|e| WeatherError::ParseError(e.to_string()))
    }

    fn select_block(
        response: ApiResponse,
        granularity: Granularity,
    ) -> Result<SeriesBlock, WeatherError> {
        let block = match granularity {
            Granularity::Hourly => response.hourly,
            Granularity::Daily => response.daily,
        };
        block.ok_or_else(|| {
            WeatherError::ParseError(format!(
                "No {} data in response",
                granularity.block()
            ))
        })
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<SampleSet, WeatherError> {
        self.fetch(latitude, longitude, Granularity::Hourly).await
    }

    async fn fetch_daily(&self, latitude: f64, longitude: f64) -> Result<SampleSet, WeatherError> {
        self.fetch(latitude, longitude, Granularity::Daily).await
    }
}
