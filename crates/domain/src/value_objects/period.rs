//! Forecast period value object
//!
//! The period selects which upstream resolution is fetched and how many
//! rows the resulting table may hold.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Maximum rows in an hourly table
pub const HOURLY_ROW_CAP: usize = 24;
/// Maximum rows in a daily table
pub const DAILY_ROW_CAP: usize = 7;
/// Maximum buckets in a weekly table
pub const WEEKLY_ROW_CAP: usize = 2;
/// Number of days rolled into one weekly bucket
pub const WEEKLY_BUCKET_DAYS: i64 = 7;

/// Requested forecast granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Next 24 hours, one row per hour
    Hourly,
    /// Next 7 days, one row per day
    Daily,
    /// Daily data rolled up into 7-day buckets
    Weekly,
}

impl Period {
    /// Wire name of the period
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Maximum number of rows a table for this period may hold
    #[must_use]
    pub const fn row_cap(&self) -> usize {
        match self {
            Self::Hourly => HOURLY_ROW_CAP,
            Self::Daily => DAILY_ROW_CAP,
            Self::Weekly => WEEKLY_ROW_CAP,
        }
    }

    /// Whether the period is served from hourly upstream data
    #[must_use]
    pub const fn uses_hourly_samples(&self) -> bool {
        matches!(self, Self::Hourly)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(DomainError::InvalidPeriod(other.to_string())),
        }
    }
}
