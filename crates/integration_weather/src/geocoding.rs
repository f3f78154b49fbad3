//! Open-Meteo geocoding client
//!
//! Resolves a city name, optionally filtered by country, to coordinates
//! using the [Open-Meteo Geocoding API](https://open-meteo.com/en/docs/geocoding-api).
//! Successful lookups are cached (1h TTL by default) to minimize API calls.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::GeocodingResponse;

/// Configuration for the geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in seconds (0 to disable)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached lookups
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    10
}

const fn default_cache_ttl_secs() -> u64 {
    3600
}

const fn default_cache_capacity() -> u64 {
    1000
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl GeocodingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_secs: 0,
            ..Default::default()
        }
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// The name could not be resolved to coordinates
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Service is temporarily unavailable
    #[error("Geocoding service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

impl GeocodingError {
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

/// First match of a geocoding search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Country name as reported by the upstream, if any
    pub country: Option<String>,
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Look up a place name and return the first match
    async fn search(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<GeocodedLocation, GeocodingError>;
}

/// Open-Meteo geocoding client with result caching
#[derive(Debug)]
pub struct OpenMeteoGeocodingClient {
    client: Client,
    config: GeocodingConfig,
    cache: Cache<(String, String), GeocodedLocation>,
}

impl OpenMeteoGeocodingClient {
    /// Create a new geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache_ttl = if config.cache_ttl_secs > 0 {
            Duration::from_secs(config.cache_ttl_secs)
        } else {
            Duration::from_millis(1) // effectively disabled
        };

        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            client,
            config: config.clone(),
            cache,
        })
    }

    fn cache_key(name: &str, country: Option<&str>) -> (String, String) {
        (
            name.to_lowercase(),
            country.unwrap_or_default().to_lowercase(),
        )
    }
}

#[async_trait]
impl GeocodingClient for OpenMeteoGeocodingClient {
    #[instrument(skip(self))]
    async fn search(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<GeocodedLocation, GeocodingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GeocodingError::LocationNotFound(
                "Name must not be empty".to_string(),
            ));
        }
        let country = country.map(str::trim).filter(|c| !c.is_empty());

        let cache_key = Self::cache_key(name, country);
        if let Some(location) = self.cache.get(&cache_key).await {
            debug!(%name, "Geocoding cache hit");
            return Ok(location);
        }

        let url = format!("{}/search", self.config.base_url);
        let mut params = vec![("name", name.to_string())];
        if let Some(country) = country {
            params.push(("country", country.to_string()));
        }

        debug!(%name, ?country, "Geocoding city");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(GeocodingError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let first = body
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| GeocodingError::LocationNotFound(name.to_string()))?;

        let location = GeocodedLocation {
            latitude: first.latitude,
            longitude: first.longitude,
            country: first.country,
        };

        self.cache.insert(cache_key, location.clone()).await;
        debug!(
            %name,
            matched = first.name.as_deref().unwrap_or_default(),
            lat = location.latitude,
            lon = location.longitude,
            "Geocoded city"
        );

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoding_config_default() {
        let config = GeocodingConfig::default();
        assert_eq!(config.base_url, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.cache_capacity, 1000);
    }

    #[test]
    fn test_geocoding_config_for_testing() {
        let config = GeocodingConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_ttl_secs, 0);
    }

    #[test]
    fn test_cache_key_is_case_insensitive() {
        assert_eq!(
            OpenMeteoGeocodingClient::cache_key("Berlin", Some("Germany")),
            OpenMeteoGeocodingClient::cache_key("BERLIN", Some("germany"))
        );
        assert_ne!(
            OpenMeteoGeocodingClient::cache_key("Berlin", None),
            OpenMeteoGeocodingClient::cache_key("Berlin", Some("Germany"))
        );
    }

    #[test]
    fn test_geocoding_error_display() {
        let err = GeocodingError::LocationNotFound("Atlantis".to_string());
        assert!(err.to_string().contains("Atlantis"));
        assert!(!err.is_retryable());

        let err = GeocodingError::Timeout;
        assert!(err.to_string().contains("timed out"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let client = OpenMeteoGeocodingClient::new(&GeocodingConfig::for_testing()).unwrap();
        let result = client.search("   ", None).await;
        assert!(matches!(result, Err(GeocodingError::LocationNotFound(_))));
    }
}
