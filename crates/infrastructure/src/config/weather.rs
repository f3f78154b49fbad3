//! Upstream Open-Meteo settings.

use integration_weather::{GeocodingConfig, WeatherConfig};
use serde::{Deserialize, Serialize};

/// Forecast and geocoding client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// Forecast API client
    #[serde(default)]
    pub forecast: WeatherConfig,

    /// Geocoding API client
    #[serde(default)]
    pub geocoding: GeocodingConfig,
}
