//! Application services
//!
//! Services orchestrate domain logic and port interactions.

pub mod aggregator;
mod forecast_service;

pub use aggregator::{build_daily_table, build_hourly_table, build_table, build_weekly_table};
pub use forecast_service::{ForecastRequest, ForecastService};
