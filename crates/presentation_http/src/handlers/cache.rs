//! Response cache statistics

use application::CacheStats;
use axum::{Json, extract::State};

use crate::state::AppState;

/// Hit/miss counters and entry count of the forecast response cache
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.forecast_service.cache_stats())
}
