//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Geocoding returned no results
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Fetching or parsing upstream forecast data failed
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    /// Upstream asked us to slow down
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Unrecognized forecast period
    #[error("Invalid period")]
    InvalidPeriod(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Whether the error came from an unknown period value
    pub fn is_invalid_period(&self) -> bool {
        matches!(
            self,
            ApplicationError::InvalidPeriod(_)
                | ApplicationError::Domain(DomainError::InvalidPeriod(_))
        )
    }
}
