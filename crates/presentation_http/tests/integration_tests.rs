//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use application::{
    ApplicationError, ForecastPort, ForecastService, GeocodingPort, ResponseCache,
    services::aggregator::{DAILY_COLUMNS, HOURLY_COLUMNS, WEEKLY_COLUMNS},
};
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::TimeDelta;
use domain::variables::{DAILY_VARIABLES, HOURLY_VARIABLES};
use domain::{Coordinate, SampleSet, TimeAxis, timestamp_from_unix};
use infrastructure::AppConfig;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::{Value, json};

const JAN_15: i64 = 1_705_276_800;

/// Geocoder that knows a single city
struct StubGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl GeocodingPort for StubGeocoder {
    async fn resolve(
        &self,
        city: &str,
        _country: Option<String>,
    ) -> Result<Coordinate, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if city.eq_ignore_ascii_case("berlin") {
            Ok(Coordinate::new(52.52, 13.41, "Germany")?)
        } else {
            Err(ApplicationError::LocationNotFound(city.to_string()))
        }
    }
}

/// Forecast source returning constant series
struct StubForecast {
    calls: AtomicUsize,
}

fn samples(points: usize, interval: TimeDelta, variables: &[&str]) -> SampleSet {
    let start = timestamp_from_unix(JAN_15).unwrap();
    let axis = TimeAxis::from_count(start, interval, points).unwrap();
    variables.iter().fold(SampleSet::new(axis), |set, variable| {
        set.with_series(*variable, vec![3_600.0; points]).unwrap()
    })
}

#[async_trait]
impl ForecastPort for StubForecast {
    async fn fetch_hourly(&self, _: &Coordinate) -> Result<SampleSet, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(samples(48, TimeDelta::hours(1), &HOURLY_VARIABLES))
    }

    async fn fetch_daily(&self, _: &Coordinate) -> Result<SampleSet, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(samples(14, TimeDelta::days(1), &DAILY_VARIABLES))
    }
}

struct Harness {
    server: TestServer,
    geocoder: Arc<StubGeocoder>,
    forecaster: Arc<StubForecast>,
}

fn harness_with_config(config: AppConfig) -> Harness {
    let geocoder = Arc::new(StubGeocoder {
        calls: AtomicUsize::new(0),
    });
    let forecaster = Arc::new(StubForecast {
        calls: AtomicUsize::new(0),
    });
    let service = ForecastService::new(
        geocoder.clone(),
        forecaster.clone(),
        Arc::new(ResponseCache::new(config.cache.ttl())),
    );
    let state = AppState {
        forecast_service: Arc::new(service),
        config: Arc::new(config),
    };
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");
    Harness {
        server,
        geocoder,
        forecaster,
    }
}

fn harness() -> Harness {
    harness_with_config(AppConfig::default())
}

fn column_names(body: &Value) -> Vec<String> {
    body.as_object().unwrap().keys().cloned().collect()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let h = harness();

    let response = h.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn daily_forecast_via_post() {
    let h = harness();

    let response = h
        .server
        .post("/weather/")
        .json(&json!({"city": "Berlin", "country": "Germany", "period": "daily"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let mut expected: Vec<String> = DAILY_COLUMNS.iter().map(ToString::to_string).collect();
    let mut actual = column_names(&body);
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
    assert_eq!(body["Date"].as_array().unwrap().len(), 7);
    assert_eq!(body["Daylight Duration(H)"][0], json!(1.0));
}

#[tokio::test]
async fn hourly_forecast_via_query() {
    let h = harness();

    let response = h
        .server
        .get("/weather/")
        .add_query_param("city", "Berlin")
        .add_query_param("period", "hourly")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(column_names(&body).len(), HOURLY_COLUMNS.len());
    assert_eq!(body["Date"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn weekly_forecast_without_trailing_slash() {
    let h = harness();

    let response = h
        .server
        .get("/weather")
        .add_query_param("city", "Berlin")
        .add_query_param("period", "weekly")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(column_names(&body).len(), WEEKLY_COLUMNS.len());
    // seven capped daily rows starting at midnight fill a single bucket
    assert_eq!(body["Date"].as_array().unwrap().len(), 1);
    assert_eq!(body["Rain Sum(mm)"][0], json!(25_200.0));
}

#[tokio::test]
async fn invalid_period_returns_error_payload() {
    let h = harness();

    let response = h
        .server
        .post("/weather/")
        .json(&json!({"city": "Berlin", "period": "monthly"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"error": ["Invalid period"]}));
    assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.forecaster.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_city_returns_error_payload() {
    let h = harness();

    let response = h
        .server
        .post("/weather/")
        .json(&json!({"city": "Atlantis", "period": "daily"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let message = body["error"][0].as_str().unwrap();
    assert!(message.contains("Location not found"));
    assert_eq!(h.forecaster.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_city_is_bad_request() {
    let h = harness();

    let response = h
        .server
        .post("/weather/")
        .json(&json!({"period": "daily"}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn empty_city_query_is_bad_request() {
    let h = harness();

    let response = h
        .server
        .get("/weather/")
        .add_query_param("city", "")
        .add_query_param("period", "daily")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn repeated_request_is_served_from_cache() {
    let h = harness();
    let request = json!({"city": "Berlin", "period": "daily", "start_date": "2024-01-20"});

    let first: Value = h.server.post("/weather/").json(&request).await.json();
    let second: Value = h.server.post("/weather/").json(&request).await.json();

    assert_eq!(first, second);
    assert_eq!(h.forecaster.calls.load(Ordering::SeqCst), 1);

    let stats: Value = h.server.get("/v1/cache/stats").await.json();
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["entries"], 1);
}

#[tokio::test]
async fn static_files_and_index_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Weather</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('ok');").unwrap();

    let mut config = AppConfig::default();
    config.server.static_dir = dir.path().to_string_lossy().into_owned();
    let h = harness_with_config(config);

    let index = h.server.get("/").await;
    index.assert_status_ok();
    assert!(index.text().contains("Weather"));

    let script = h.server.get("/static/app.js").await;
    script.assert_status_ok();
    assert!(script.text().contains("console.log"));

    let listing = h.server.get("/static/").await;
    listing.assert_status_ok();
    assert!(listing.text().contains("Weather"));

    h.server.get("/static/missing.css").await.assert_status_not_found();
}
