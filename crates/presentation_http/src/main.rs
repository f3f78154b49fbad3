//! Weather forecast HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::{ForecastService, ResponseCache};
use infrastructure::{
    AppConfig, ForecastAdapter, GeocodingAdapter, ServerConfig, TelemetryConfig, init_telemetry,
};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so log_format can apply
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_telemetry(&TelemetryConfig::from_log_format(&config.server.log_format))?;
    if let Some(e) = load_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        "Weather server v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );
    info!(
        host = %config.server.host,
        port = %config.server.port,
        cache_ttl_secs = config.cache.ttl_secs,
        max_retries = config.retry.max_retries,
        "Configuration loaded"
    );

    // Upstream adapters
    let geocoder = GeocodingAdapter::with_config(&config.weather.geocoding, config.retry.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding client: {e}"))?;
    let forecaster = ForecastAdapter::with_config(config.weather.forecast.clone(), config.retry.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize forecast client: {e}"))?;

    let forecast_service = ForecastService::new(
        Arc::new(geocoder),
        Arc::new(forecaster),
        Arc::new(ResponseCache::new(config.cache.ttl())),
    );

    let state = AppState {
        forecast_service: Arc::new(forecast_service),
        config: Arc::new(config.clone()),
    };

    let app = routes::create_router(state)
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Serving static files from {}", config.server.static_dir);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// CORS: permissive when no origins are configured, otherwise restricted
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    use axum::http::{HeaderValue, Method};

    if !server.cors_enabled {
        return CorsLayer::new();
    }
    if server.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
