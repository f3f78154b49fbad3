//! Forecast port
//!
//! Defines the interface for retrieving raw forecast samples.

use async_trait::async_trait;
use domain::{Coordinate, SampleSet};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for raw forecast retrieval
///
/// Implementations return every requested variable by name on a shared
/// time axis. Values the upstream reported as missing are `NaN`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Fetch the hourly variables for a coordinate
    async fn fetch_hourly(&self, coordinate: &Coordinate) -> Result<SampleSet, ApplicationError>;

    /// Fetch the daily variables for a coordinate
    async fn fetch_daily(&self, coordinate: &Coordinate) -> Result<SampleSet, ApplicationError>;
}
