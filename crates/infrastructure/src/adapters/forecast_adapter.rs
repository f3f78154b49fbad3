//! Forecast adapter - Implements ForecastPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::ForecastPort;
use async_trait::async_trait;
use domain::{Coordinate, SampleSet};
use integration_weather::{OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Fetches hourly and daily samples from the Open-Meteo forecast API
pub struct ForecastAdapter {
    client: Arc<dyn WeatherClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for ForecastAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAdapter")
            .field("client", &"dyn WeatherClient")
            .field("max_retries", &self.retry.max_retries)
            .finish()
    }
}

impl ForecastAdapter {
    /// Create an adapter over the Open-Meteo forecast client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenMeteoClient::new(config).map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client), retry))
    }

    /// Create an adapter over any weather client
    #[must_use]
    pub fn new(client: Arc<dyn WeatherClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::InvalidCoordinates => {
                ApplicationError::Domain(domain::DomainError::InvalidCoordinates)
            },
            other => ApplicationError::UpstreamFetch(other.to_string()),
        }
    }
}

#[async_trait]
impl ForecastPort for ForecastAdapter {
    #[instrument(skip(self), fields(coordinate = %coordinate))]
    async fn fetch_hourly(&self, coordinate: &Coordinate) -> Result<SampleSet, ApplicationError> {
        let samples = retry(&self.retry, || {
            self.client
                .fetch_hourly(coordinate.latitude(), coordinate.longitude())
        })
        .await
        .map_err(Self::map_error)?;

        debug!(rows = samples.len(), "Fetched hourly samples");
        Ok(samples)
    }

    #[instrument(skip(self), fields(coordinate = %coordinate))]
    async fn fetch_daily(&self, coordinate: &Coordinate) -> Result<SampleSet, ApplicationError> {
        let samples = retry(&self.retry, || {
            self.client
                .fetch_daily(coordinate.latitude(), coordinate.longitude())
        })
        .await
        .map_err(Self::map_error)?;

        debug!(rows = samples.len(), "Fetched daily samples");
        Ok(samples)
    }
}
