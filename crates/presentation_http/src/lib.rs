//! Weather forecast HTTP presentation layer
//!
//! Serves the forecast API, the landing page and static assets.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{ValidatedJson, ValidatedQuery, ValidationError};
pub use routes::create_router;
pub use state::AppState;
