//! Application state shared across handlers

use std::sync::Arc;

use application::ForecastService;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Forecast orchestration, owning the response cache
    pub forecast_service: Arc<ForecastService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
