//! Geocoding port
//!
//! Resolves a city (optionally filtered by country) to a coordinate.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for city-to-coordinate resolution
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a city to the first coordinate the upstream returns
    ///
    /// # Errors
    ///
    /// Returns `LocationNotFound` if the upstream result set is empty.
    async fn resolve(
        &self,
        city: &str,
        country: Option<String>,
    ) -> Result<Coordinate, ApplicationError>;
}
