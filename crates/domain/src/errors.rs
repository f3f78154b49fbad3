//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Unknown forecast period
    #[error("Invalid period")]
    InvalidPeriod(String),

    /// Time axis cannot produce an ordered sequence of timestamps
    #[error("Invalid time axis: {0}")]
    InvalidTimeAxis(String),

    /// A named variable is absent from a sample set
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// A row or series does not match the expected width/length
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected number of cells or samples
        expected: usize,
        /// Actual number of cells or samples
        actual: usize,
    },

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}

impl DomainError {
    /// Create a shape mismatch error
    #[must_use]
    pub const fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }
}
