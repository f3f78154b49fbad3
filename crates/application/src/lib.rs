//! Application layer - Use cases and orchestration
//!
//! Contains the forecast aggregation, the response cache and the port
//! definitions. Orchestrates domain objects and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod response_cache;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use response_cache::{CacheStats, Clock, ManualClock, ResponseCache, SystemClock};
pub use services::*;
