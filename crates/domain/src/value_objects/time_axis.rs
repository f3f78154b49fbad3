//! Shared time axis of a forecast sample set

use chrono::{DateTime, TimeDelta, Utc};

use crate::errors::DomainError;

/// Display format for timestamps, e.g. `2024-01-15 00:00:00+00:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Render a timestamp in the table display format
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp previously rendered with [`format_timestamp`]
///
/// # Errors
///
/// Returns `InvalidDateTime` if the string is not in the display format.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::InvalidDateTime(format!("{s}: {e}")))
}

/// Convert unix seconds into a UTC timestamp
///
/// # Errors
///
/// Returns `InvalidDateTime` if the value is out of chrono's range.
pub fn timestamp_from_unix(secs: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DomainError::InvalidDateTime(format!("unix time {secs} out of range")))
}

/// Fixed-interval, half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: TimeDelta,
}

impl TimeAxis {
    /// Create a new axis
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimeAxis` if the interval is not positive or the end
    /// lies before the start.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: TimeDelta,
    ) -> Result<Self, DomainError> {
        if interval <= TimeDelta::zero() {
            return Err(DomainError::InvalidTimeAxis(format!(
                "interval must be positive, got {}s",
                interval.num_seconds()
            )));
        }
        if end < start {
            return Err(DomainError::InvalidTimeAxis(format!(
                "end {end} is before start {start}"
            )));
        }
        Ok(Self {
            start,
            end,
            interval,
        })
    }

    /// Axis covering `count` points spaced `interval` apart from `start`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimeAxis` if the interval is not positive or the
    /// end overflows.
    pub fn from_count(
        start: DateTime<Utc>,
        interval: TimeDelta,
        count: usize,
    ) -> Result<Self, DomainError> {
        let steps = i32::try_from(count)
            .map_err(|_| DomainError::InvalidTimeAxis(format!("too many points: {count}")))?;
        let span = interval
            .checked_mul(steps)
            .ok_or_else(|| DomainError::InvalidTimeAxis("span overflows".to_string()))?;
        let end = start
            .checked_add_signed(span)
            .ok_or_else(|| DomainError::InvalidTimeAxis("end overflows".to_string()))?;
        Self::new(start, end, interval)
    }

    /// First timestamp (inclusive)
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Upper bound (exclusive)
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Spacing between consecutive points
    #[must_use]
    pub const fn interval(&self) -> TimeDelta {
        self.interval
    }

    /// Number of points on the axis
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the axis holds no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Ascending timestamps with the end excluded
    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        std::iter::successors(Some(self.start), move |t| t.checked_add_signed(self.interval))
            .take_while(move |t| *t < self.end)
    }

    /// Materialize the axis into a vector of timestamps
    #[must_use]
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn end_is_excluded() {
        let axis = TimeAxis::new(t0(), t0() + TimeDelta::hours(24), TimeDelta::hours(1)).unwrap();
        let ts = axis.timestamps();
        assert_eq!(ts.len(), 24);
        assert_eq!(ts[0], t0());
        assert_eq!(ts[23], t0() + TimeDelta::hours(23));
    }

    #[test]
    fn timestamps_are_ascending() {
        let axis = TimeAxis::from_count(t0(), TimeDelta::days(1), 7).unwrap();
        let ts = axis.timestamps();
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(axis.len(), 7);
    }

    #[test]
    fn empty_axis() {
        let axis = TimeAxis::new(t0(), t0(), TimeDelta::hours(1)).unwrap();
        assert!(axis.is_empty());
        assert!(axis.timestamps().is_empty());
    }

    #[test]
    fn rejects_non_positive_interval() {
        assert!(TimeAxis::new(t0(), t0() + TimeDelta::hours(1), TimeDelta::zero()).is_err());
        assert!(TimeAxis::new(t0(), t0() + TimeDelta::hours(1), TimeDelta::hours(-1)).is_err());
    }

    #[test]
    fn rejects_end_before_start() {
        assert!(TimeAxis::new(t0(), t0() - TimeDelta::hours(1), TimeDelta::hours(1)).is_err());
    }

    #[test]
    fn format_and_parse_timestamp() {
        let s = format_timestamp(&t0());
        assert_eq!(s, "2024-01-15 00:00:00+00:00");
        assert_eq!(parse_timestamp(&s).unwrap(), t0());
    }

    #[test]
    fn parse_rejects_other_formats() {
        assert!(parse_timestamp("2024-01-15").is_err());
        assert!(parse_timestamp("garbage").is_err());
    }

    #[test]
    fn unix_conversion() {
        assert_eq!(timestamp_from_unix(1_705_276_800).unwrap(), t0());
    }
}
