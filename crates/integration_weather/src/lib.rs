//! Open-Meteo weather integration
//!
//! Clients for the Open-Meteo Forecast and Geocoding APIs
//! (<https://open-meteo.com>). Neither requires an API key.

pub mod client;
pub mod geocoding;
mod models;

pub use client::{Granularity, OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
pub use geocoding::{
    GeocodedLocation, GeocodingClient, GeocodingConfig, GeocodingError, OpenMeteoGeocodingClient,
};
