//! Response cache key
//!
//! Identifies a forecast query by the exact strings the client sent.
//! No normalization is applied: `None`, `Some("")` and differently cased
//! country names are distinct keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Period;

/// Identity of a forecast query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    city: String,
    country: Option<String>,
    period: Period,
}

impl CacheKey {
    /// Create a key from the raw request fields
    #[must_use]
    pub fn new(city: impl Into<String>, country: Option<String>, period: Period) -> Self {
        Self {
            city: city.into(),
            country,
            period,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.city,
            self.country.as_deref().unwrap_or("None"),
            self.period
        )
    }
}
