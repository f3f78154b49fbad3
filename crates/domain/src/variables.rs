//! Upstream forecast variable catalog
//!
//! Names follow the Open-Meteo forecast API. The lists are the fixed,
//! versioned request sets; tables address series by these names.

/// Air temperature at 2 m (°C)
pub const TEMPERATURE_2M: &str = "temperature_2m";
/// Rain of the preceding hour (mm)
pub const RAIN: &str = "rain";
/// Wind speed at 10 m
pub const WIND_SPEED_10M: &str = "wind_speed_10m";
/// Visibility (m)
pub const VISIBILITY: &str = "visibility";
/// Relative humidity at 2 m (%)
pub const RELATIVE_HUMIDITY_2M: &str = "relative_humidity_2m";

/// Daily maximum temperature (°C)
pub const TEMPERATURE_2M_MAX: &str = "temperature_2m_max";
/// Daily minimum temperature (°C)
pub const TEMPERATURE_2M_MIN: &str = "temperature_2m_min";
/// Daily rain sum (mm)
pub const RAIN_SUM: &str = "rain_sum";
/// Daily maximum wind speed at 10 m
pub const WIND_SPEED_10M_MAX: &str = "wind_speed_10m_max";
/// Sunrise (unix seconds)
pub const SUNRISE: &str = "sunrise";
/// Sunset (unix seconds)
pub const SUNSET: &str = "sunset";
/// Daylight duration (seconds)
pub const DAYLIGHT_DURATION: &str = "daylight_duration";
/// Sunshine duration (seconds)
pub const SUNSHINE_DURATION: &str = "sunshine_duration";
/// Daily maximum UV index
pub const UV_INDEX_MAX: &str = "uv_index_max";

/// Variables requested for hourly forecasts, in request order
pub const HOURLY_VARIABLES: [&str; 5] = [
    TEMPERATURE_2M,
    RAIN,
    WIND_SPEED_10M,
    VISIBILITY,
    RELATIVE_HUMIDITY_2M,
];

/// Variables requested for daily forecasts, in request order
pub const DAILY_VARIABLES: [&str; 9] = [
    TEMPERATURE_2M_MAX,
    TEMPERATURE_2M_MIN,
    RAIN_SUM,
    WIND_SPEED_10M_MAX,
    SUNRISE,
    SUNSET,
    DAYLIGHT_DURATION,
    SUNSHINE_DURATION,
    UV_INDEX_MAX,
];
