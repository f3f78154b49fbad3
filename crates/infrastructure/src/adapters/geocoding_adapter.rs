//! Geocoding adapter - Implements GeocodingPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::Coordinate;
use integration_weather::{
    GeocodingClient, GeocodingConfig, GeocodingError, OpenMeteoGeocodingClient,
};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Resolves city names through the Open-Meteo geocoding API
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"dyn GeocodingClient")
            .field("max_retries", &self.retry.max_retries)
            .finish()
    }
}

impl GeocodingAdapter {
    /// Create an adapter over the Open-Meteo geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(
        config: &GeocodingConfig,
        retry: RetryConfig,
    ) -> Result<Self, ApplicationError> {
        let client = OpenMeteoGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client), retry))
    }

    /// Create an adapter over any geocoding client
    #[must_use]
    pub fn new(client: Arc<dyn GeocodingClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Map integration geocoding error to application error
    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::LocationNotFound(name) => ApplicationError::LocationNotFound(name),
            GeocodingError::RateLimitExceeded => ApplicationError::RateLimited,
            other => ApplicationError::UpstreamFetch(other.to_string()),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn resolve(
        &self,
        city: &str,
        country: Option<String>,
    ) -> Result<Coordinate, ApplicationError> {
        let location = retry(&self.retry, || {
            self.client.search(city, country.as_deref())
        })
        .await
        .map_err(Self::map_error)?;

        let resolved_country = location
            .country
            .or(country)
            .unwrap_or_default();
        debug!(
            lat = location.latitude,
            lon = location.longitude,
            country = %resolved_country,
            "Resolved location"
        );

        Ok(Coordinate::new(
            location.latitude,
            location.longitude,
            resolved_country,
        )?)
    }
}
