//! Forecast service - request orchestration
//!
//! Validates the period, consults the response cache and, on a miss,
//! geocodes the city, fetches raw samples and aggregates them into a table.

use std::sync::Arc;

use domain::{CacheKey, Period, TablePayload};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::aggregator;
use crate::error::ApplicationError;
use crate::ports::{ForecastPort, GeocodingPort};
use crate::response_cache::{CacheStats, ResponseCache};

/// A forecast query as received from a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// City name
    pub city: String,
    /// Optional country filter for geocoding
    #[serde(default)]
    pub country: Option<String>,
    /// `hourly`, `daily` or `weekly`
    pub period: String,
    /// Accepted for compatibility; not applied to the upstream query
    #[serde(default)]
    pub start_date: Option<String>,
}

impl ForecastRequest {
    /// Create a request without country or start date
    pub fn new(city: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: None,
            period: period.into(),
            start_date: None,
        }
    }

    /// Set the country filter
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }
}

/// Orchestrates geocoding, fetching, aggregation and caching
pub struct ForecastService {
    geocoder: Arc<dyn GeocodingPort>,
    forecaster: Arc<dyn ForecastPort>,
    cache: Arc<ResponseCache>,
}

impl std::fmt::Debug for ForecastService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ForecastService {
    /// Create a new forecast service
    pub fn new(
        geocoder: Arc<dyn GeocodingPort>,
        forecaster: Arc<dyn ForecastPort>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            geocoder,
            forecaster,
            cache,
        }
    }

    /// Response cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Produce the table payload for a request
    ///
    /// An unknown period fails before the cache or any upstream is touched.
    #[instrument(skip(self), fields(city = %request.city, period = %request.period))]
    pub async fn forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<TablePayload, ApplicationError> {
        let period: Period = request
            .period
            .parse()
            .map_err(|_| ApplicationError::InvalidPeriod(request.period.clone()))?;

        if let Some(start_date) = &request.start_date {
            debug!(%start_date, "start_date is accepted but not applied");
        }

        let key = CacheKey::new(request.city.clone(), request.country.clone(), period);
        self.cache
            .get_or_try_insert_with(key, || {
                self.compute(&request.city, request.country.clone(), period)
            })
            .await
    }

    /// Like [`forecast`](Self::forecast), but folds failures into the
    /// `{"error": [message]}` payload
    pub async fn report(&self, request: &ForecastRequest) -> TablePayload {
        match self.forecast(request).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, city = %request.city, "Forecast request failed");
                TablePayload::error(e.to_string())
            },
        }
    }

    async fn compute(
        &self,
        city: &str,
        country: Option<String>,
        period: Period,
    ) -> Result<TablePayload, ApplicationError> {
        let coordinate = self.geocoder.resolve(city, country).await?;
        debug!(%coordinate, "Resolved location");

        let samples = if period.uses_hourly_samples() {
            self.forecaster.fetch_hourly(&coordinate).await?
        } else {
            self.forecaster.fetch_daily(&coordinate).await?
        };

        let table = aggregator::build_table(period, &samples)?;
        info!(rows = table.len(), %period, "Built forecast table");
        Ok(table.to_payload())
    }
}
