//! Open-Meteo wire models
//!
//! Raw JSON shapes of the forecast and geocoding APIs, and the conversion of
//! a forecast block into a named [`SampleSet`].

use std::collections::HashMap;

use chrono::TimeDelta;
use domain::{SampleSet, TimeAxis, timestamp_from_unix};
use serde::Deserialize;
use thiserror::Error;

/// Top-level forecast API response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse {
    /// Latitude of the grid cell used
    pub latitude: f64,
    /// Longitude of the grid cell used
    pub longitude: f64,
    /// Hourly block, present when hourly variables were requested
    #[serde(default)]
    pub hourly: Option<SeriesBlock>,
    /// Daily block, present when daily variables were requested
    #[serde(default)]
    pub daily: Option<SeriesBlock>,
}

/// A `time` array plus one array per requested variable
///
/// With `timeformat=unixtime` every entry, including `time`, `sunrise` and
/// `sunset`, is numeric. Missing values arrive as `null`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SeriesBlock {
    pub time: Vec<i64>,
    #[serde(flatten)]
    pub series: HashMap<String, Vec<Option<f64>>>,
}

/// Reasons a block cannot be turned into samples
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum BlockError {
    #[error("time axis is empty")]
    Empty,
    #[error("time axis step must be positive, got {0}s")]
    Interval(i64),
    #[error("variable '{0}' missing from response")]
    Missing(String),
    #[error("variable '{variable}' has {actual} values, time axis has {expected}")]
    Length {
        variable: String,
        expected: usize,
        actual: usize,
    },
    #[error("invalid time axis: {0}")]
    Axis(String),
}

impl SeriesBlock {
    /// Build the named sample set for `variables`
    ///
    /// The axis starts at `time[0]` and steps by `time[1] - time[0]`, or by
    /// `nominal` when only one point was returned.
    pub fn into_samples(
        mut self,
        variables: &[&str],
        nominal: TimeDelta,
    ) -> Result<SampleSet, BlockError> {
        let first = *self.time.first().ok_or(BlockError::Empty)?;
        let interval = match self.time.get(1) {
            Some(second) if *second > first => TimeDelta::seconds(second - first),
            Some(second) => return Err(BlockError::Interval(second - first)),
            None => nominal,
        };

        let start = timestamp_from_unix(first).map_err(|e| BlockError::Axis(e.to_string()))?;
        let axis = TimeAxis::from_count(start, interval, self.time.len())
            .map_err(|e| BlockError::Axis(e.to_string()))?;

        let mut samples = SampleSet::new(axis);
        for variable in variables {
            let raw = self
                .series
                .remove(*variable)
                .ok_or_else(|| BlockError::Missing((*variable).to_string()))?;
            if raw.len() != self.time.len() {
                return Err(BlockError::Length {
                    variable: (*variable).to_string(),
                    expected: self.time.len(),
                    actual: raw.len(),
                });
            }
            let values = raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            samples
                .insert(*variable, values)
                .map_err(|e| BlockError::Axis(e.to_string()))?;
        }
        Ok(samples)
    }
}

/// Geocoding API response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeocodingResponse {
    /// Absent entirely when nothing matched
    #[serde(default)]
    pub results: Option<Vec<GeocodingResult>>,
}

/// A single geocoding match
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeocodingResult {
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: serde_json::Value) -> SeriesBlock {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn block_builds_named_series() {
        let b = block(json!({
            "time": [1_705_276_800, 1_705_280_400, 1_705_284_000],
            "rain": [0.0, 0.2, null],
            "visibility": [100.0, 200.0, 300.0]
        }));
        let samples = b
            .into_samples(&["visibility", "rain"], TimeDelta::hours(1))
            .unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples.series("visibility").unwrap(), &[100.0, 200.0, 300.0]);
        assert!(samples.series("rain").unwrap()[2].is_nan());
        assert_eq!(samples.axis().interval(), TimeDelta::hours(1));
        assert_eq!(samples.axis().start().timestamp(), 1_705_276_800);
    }

    #[test]
    fn single_point_uses_nominal_interval() {
        let b = block(json!({"time": [1_705_276_800], "rain_sum": [1.0]}));
        let samples = b.into_samples(&["rain_sum"], TimeDelta::days(1)).unwrap();
        assert_eq!(samples.axis().interval(), TimeDelta::days(1));
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn integer_series_are_accepted() {
        let b = block(json!({
            "time": [1_705_276_800, 1_705_363_200],
            "sunrise": [1_705_302_000, 1_705_388_340]
        }));
        let samples = b.into_samples(&["sunrise"], TimeDelta::days(1)).unwrap();
        assert!((samples.series("sunrise").unwrap()[0] - 1_705_302_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let b = block(json!({"time": [0, 3600], "rain": [1.0]}));
        let err = b.into_samples(&["rain"], TimeDelta::hours(1)).unwrap_err();
        assert!(matches!(err, BlockError::Length { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn missing_variable_is_rejected() {
        let b = block(json!({"time": [0, 3600], "rain": [1.0, 2.0]}));
        let err = b.into_samples(&["visibility"], TimeDelta::hours(1)).unwrap_err();
        assert_eq!(err, BlockError::Missing("visibility".to_string()));
    }

    #[test]
    fn empty_and_unordered_axes_are_rejected() {
        let b = block(json!({"time": []}));
        assert_eq!(
            b.into_samples(&[], TimeDelta::hours(1)).unwrap_err(),
            BlockError::Empty
        );

        let b = block(json!({"time": [3600, 0]}));
        assert_eq!(
            b.into_samples(&[], TimeDelta::hours(1)).unwrap_err(),
            BlockError::Interval(-3600)
        );
    }

    #[test]
    fn geocoding_without_results_field() {
        let resp: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(resp.results.is_none());
    }

    #[test]
    fn geocoding_result_fields() {
        let resp: GeocodingResponse = serde_json::from_value(json!({
            "results": [{"id": 1, "name": "Berlin", "latitude": 52.52, "longitude": 13.41, "country": "Germany"}]
        }))
        .unwrap();
        let first = &resp.results.unwrap()[0];
        assert_eq!(first.country.as_deref(), Some("Germany"));
        assert_eq!(first.name.as_deref(), Some("Berlin"));
    }
}
