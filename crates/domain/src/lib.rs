//! Domain layer for the weather forecast service
//!
//! Contains the forecast value objects, sample and table entities, and
//! domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;
pub mod variables;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
