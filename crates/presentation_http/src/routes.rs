//! Route definitions

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::{
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let static_dir = Path::new(&state.config.server.static_dir);
    let index = ServeFile::new(static_dir.join("index.html"));
    let assets = ServeDir::new(static_dir).append_index_html_on_directories(true);
    let body_limit = state.config.server.max_body_size_json_bytes;

    Router::new()
        // Landing page and static assets
        .route_service("/", index)
        .nest_service("/static", assets)
        // Health and operator endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/v1/cache/stats", get(handlers::cache::cache_stats))
        // Forecast API
        .route(
            "/weather/",
            get(handlers::weather::weather_query).post(handlers::weather::weather_json),
        )
        .route(
            "/weather",
            get(handlers::weather::weather_query).post(handlers::weather::weather_json),
        )
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
