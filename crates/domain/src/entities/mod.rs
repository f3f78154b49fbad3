//! Domain entities - Forecast samples and tables

mod forecast_table;
mod sample_set;

pub use forecast_table::{Cell, DATE_COLUMN, ERROR_COLUMN, ForecastRow, ForecastTable, TablePayload};
pub use sample_set::SampleSet;
