//! Raw upstream samples addressed by variable name
//!
//! A `SampleSet` holds every series returned by one upstream fetch. All
//! series share the same [`TimeAxis`], so the value at index `i` of any
//! series belongs to the `i`-th timestamp of the axis.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::errors::DomainError;
use crate::value_objects::TimeAxis;

/// Time-aligned series keyed by upstream variable name
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    axis: TimeAxis,
    len: usize,
    series: HashMap<String, Vec<f64>>,
}

impl SampleSet {
    /// Create an empty set on the given axis
    #[must_use]
    pub fn new(axis: TimeAxis) -> Self {
        Self {
            axis,
            len: axis.len(),
            series: HashMap::new(),
        }
    }

    /// Add a series, replacing any previous series of the same name
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the series length differs from the axis.
    pub fn insert(
        &mut self,
        variable: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), DomainError> {
        if values.len() != self.len {
            return Err(DomainError::shape_mismatch(self.len, values.len()));
        }
        self.series.insert(variable.into(), values);
        Ok(())
    }

    /// Builder-style variant of [`insert`](Self::insert)
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the series length differs from the axis.
    pub fn with_series(
        mut self,
        variable: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, DomainError> {
        self.insert(variable, values)?;
        Ok(self)
    }

    /// Look up a series by variable name
    ///
    /// # Errors
    ///
    /// Returns `MissingVariable` if the variable was not fetched.
    pub fn series(&self, variable: &str) -> Result<&[f64], DomainError> {
        self.series
            .get(variable)
            .map(Vec::as_slice)
            .ok_or_else(|| DomainError::MissingVariable(variable.to_string()))
    }

    /// The shared time axis
    #[must_use]
    pub const fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    /// Timestamps of the axis, ascending
    #[must_use]
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.axis.timestamps()
    }

    /// Number of samples per series
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the axis holds no samples
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Names of all series in the set
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}
