//! Value Objects - Immutable, identity-less domain primitives

mod cache_key;
mod coordinate;
mod period;
mod time_axis;

pub use cache_key::CacheKey;
pub use coordinate::Coordinate;
pub use period::{
    DAILY_ROW_CAP, HOURLY_ROW_CAP, Period, WEEKLY_BUCKET_DAYS, WEEKLY_ROW_CAP,
};
pub use time_axis::{
    TIMESTAMP_FORMAT, TimeAxis, format_timestamp, parse_timestamp, timestamp_from_unix,
};
