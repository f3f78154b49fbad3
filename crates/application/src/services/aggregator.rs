//! Forecast aggregation
//!
//! Turns raw upstream samples into capped, labeled tables. Hourly and daily
//! tables are a direct zip of the time axis with named series; the weekly
//! table rolls the capped daily table up into 7-day buckets.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use domain::variables::{
    DAYLIGHT_DURATION, HOURLY_VARIABLES, RAIN_SUM, SUNRISE, SUNSET, SUNSHINE_DURATION,
    TEMPERATURE_2M_MAX, TEMPERATURE_2M_MIN, UV_INDEX_MAX, WIND_SPEED_10M_MAX,
};
use domain::{
    Cell, DATE_COLUMN, DomainError, ForecastTable, Period, SampleSet, WEEKLY_BUCKET_DAYS,
    timestamp_from_unix,
};

use crate::error::ApplicationError;

/// Hourly temperature column
pub const TEMPERATURE: &str = "Temperature(°C)";
/// Hourly rain column
pub const RAIN_MM: &str = "Rain(mm)";
/// Hourly wind speed column
pub const WIND_SPEED: &str = "Wind Speed(m/s)";
/// Hourly visibility column
pub const VISIBILITY_M: &str = "Visibility(m)";
/// Hourly humidity column
pub const HUMIDITY: &str = "Humidity(%)";

/// Daily maximum temperature column
pub const TEMPERATURE_MAX: &str = "Temperature Max(°C)";
/// Daily minimum temperature column
pub const TEMPERATURE_MIN: &str = "Temperature Min(°C)";
/// Daily rain sum column
pub const RAIN_SUM_MM: &str = "Rain Sum(mm)";
/// Daily maximum wind speed column
pub const WIND_SPEED_MAX: &str = "Wind Speed Max(m/s)";
/// Sunrise column
pub const SUNRISE_COLUMN: &str = "Sunrise";
/// Sunset column
pub const SUNSET_COLUMN: &str = "Sunset";
/// Daylight duration column, in hours
pub const DAYLIGHT_HOURS: &str = "Daylight Duration(H)";
/// Sunshine duration column, in hours
pub const SUNSHINE_HOURS: &str = "Sunshine Duration(H)";
/// Daily UV index column
pub const UV_INDEX: &str = "UV Index Max";

/// Hourly table columns, in output order
pub const HOURLY_COLUMNS: [&str; 6] = [
    DATE_COLUMN,
    TEMPERATURE,
    RAIN_MM,
    WIND_SPEED,
    VISIBILITY_M,
    HUMIDITY,
];

/// Daily table columns, in output order
pub const DAILY_COLUMNS: [&str; 10] = [
    DATE_COLUMN,
    TEMPERATURE_MAX,
    TEMPERATURE_MIN,
    RAIN_SUM_MM,
    WIND_SPEED_MAX,
    SUNRISE_COLUMN,
    SUNSET_COLUMN,
    DAYLIGHT_HOURS,
    SUNSHINE_HOURS,
    UV_INDEX,
];

/// Weekly table columns, in output order
pub const WEEKLY_COLUMNS: [&str; 5] = [
    DATE_COLUMN,
    TEMPERATURE_MAX,
    TEMPERATURE_MIN,
    RAIN_SUM_MM,
    WIND_SPEED_MAX,
];

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Build the hourly table, capped at 24 rows
pub fn build_hourly_table(samples: &SampleSet) -> Result<ForecastTable, ApplicationError> {
    let series = HOURLY_VARIABLES
        .iter()
        .map(|name| samples.series(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = ForecastTable::new(HOURLY_COLUMNS);
    for (i, ts) in samples.timestamps().into_iter().enumerate() {
        let mut row = Vec::with_capacity(HOURLY_COLUMNS.len());
        row.push(Cell::Timestamp(ts));
        row.extend(series.iter().map(|values| Cell::Number(values[i])));
        table.push_row(row)?;
    }
    table.truncate(Period::Hourly.row_cap());
    Ok(table)
}

/// Build the daily table, capped at 7 rows
///
/// Daylight and sunshine durations are converted from seconds to hours and
/// sunrise/sunset become timestamps.
pub fn build_daily_table(samples: &SampleSet) -> Result<ForecastTable, ApplicationError> {
    let temp_max = samples.series(TEMPERATURE_2M_MAX)?;
    let temp_min = samples.series(TEMPERATURE_2M_MIN)?;
    let rain_sum = samples.series(RAIN_SUM)?;
    let wind_max = samples.series(WIND_SPEED_10M_MAX)?;
    let sunrise = samples.series(SUNRISE)?;
    let sunset = samples.series(SUNSET)?;
    let daylight = to_hours(samples.series(DAYLIGHT_DURATION)?);
    let sunshine = to_hours(samples.series(SUNSHINE_DURATION)?);
    let uv_index = samples.series(UV_INDEX_MAX)?;

    let mut table = ForecastTable::new(DAILY_COLUMNS);
    for (i, ts) in samples.timestamps().into_iter().enumerate() {
        table.push_row(vec![
            Cell::Timestamp(ts),
            Cell::Number(temp_max[i]),
            Cell::Number(temp_min[i]),
            Cell::Number(rain_sum[i]),
            Cell::Number(wind_max[i]),
            unix_cell(sunrise[i])?,
            unix_cell(sunset[i])?,
            Cell::Number(daylight[i]),
            Cell::Number(sunshine[i]),
            Cell::Number(uv_index[i]),
        ])?;
    }
    table.truncate(Period::Daily.row_cap());
    Ok(table)
}

/// Roll a daily table up into 7-day buckets, capped at 2 rows
///
/// Buckets start at midnight UTC of the first row's date and are not aligned
/// to calendar weeks. `NaN` values are skipped; an all-missing bucket yields
/// `NaN` for mean/max and `0` for the rain sum.
pub fn build_weekly_table(daily: &ForecastTable) -> Result<ForecastTable, ApplicationError> {
    let dates = daily
        .column(DATE_COLUMN)?
        .iter()
        .map(|cell| {
            cell.as_timestamp().ok_or_else(|| {
                DomainError::InvalidDateTime("daily date column holds a number".to_string())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let temp_max = daily.numeric_column(TEMPERATURE_MAX)?;
    let temp_min = daily.numeric_column(TEMPERATURE_MIN)?;
    let rain_sum = daily.numeric_column(RAIN_SUM_MM)?;
    let wind_max = daily.numeric_column(WIND_SPEED_MAX)?;

    let mut table = ForecastTable::new(WEEKLY_COLUMNS);
    let Some(first) = dates.first() else {
        return Ok(table);
    };
    let origin = midnight(*first);
    let width = TimeDelta::days(WEEKLY_BUCKET_DAYS);

    let mut buckets: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, date) in dates.iter().enumerate() {
        let index = (*date - origin).num_days().div_euclid(WEEKLY_BUCKET_DAYS);
        buckets.entry(index).or_default().push(i);
    }

    for (index, rows) in buckets {
        let start = origin + width * i32::try_from(index).unwrap_or(i32::MAX);
        let pick = |column: &[f64]| rows.iter().map(|&i| column[i]).collect::<Vec<_>>();
        table.push_row(vec![
            Cell::Timestamp(start),
            Cell::Number(mean(&pick(&temp_max))),
            Cell::Number(mean(&pick(&temp_min))),
            Cell::Number(sum(&pick(&rain_sum))),
            Cell::Number(max(&pick(&wind_max))),
        ])?;
    }
    table.truncate(Period::Weekly.row_cap());
    Ok(table)
}

/// Build the table for a period from fetched samples
pub fn build_table(period: Period, samples: &SampleSet) -> Result<ForecastTable, ApplicationError> {
    match period {
        Period::Hourly => build_hourly_table(samples),
        Period::Daily => build_daily_table(samples),
        Period::Weekly => build_weekly_table(&build_daily_table(samples)?),
    }
}

fn to_hours(seconds: &[f64]) -> Vec<f64> {
    seconds.iter().map(|s| s / SECONDS_PER_HOUR).collect()
}

#[allow(clippy::cast_possible_truncation)]
fn unix_cell(value: f64) -> Result<Cell, DomainError> {
    if value.is_finite() {
        Ok(Cell::Timestamp(timestamp_from_unix(value.round() as i64)?))
    } else {
        Ok(Cell::Number(f64::NAN))
    }
}

fn midnight(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn present(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    let (total, count) = present(values).fold((0.0, 0usize), |(t, c), v| (t + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        total / count as f64
    }
}

fn sum(values: &[f64]) -> f64 {
    present(values).sum()
}

fn max(values: &[f64]) -> f64 {
    present(values).fold(f64::NAN, f64::max)
}
