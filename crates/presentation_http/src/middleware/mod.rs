//! HTTP middleware components
//!
//! Request extractors that validate input before it reaches a handler.

pub mod validation;

pub use validation::{ValidatedJson, ValidatedQuery, ValidationError};
