//! Integration tests for the Open-Meteo clients using wiremock
//!
//! These tests verify the forecast and geocoding clients against a mock HTTP
//! server, ensuring proper handling of various response scenarios.

use domain::variables::{DAILY_VARIABLES, HOURLY_VARIABLES};
use integration_weather::{
    GeocodingClient, GeocodingConfig, GeocodingError, OpenMeteoClient, OpenMeteoGeocodingClient,
    WeatherClient, WeatherConfig, WeatherError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const JAN_15: i64 = 1_705_276_800;

/// Hourly forecast response with `n` points
fn hourly_response(n: i64) -> serde_json::Value {
    let time: Vec<i64> = (0..n).map(|i| JAN_15 + i * 3600).collect();
    let ramp: Vec<f64> = (0..n).map(|i| i as f64).collect();
    serde_json::json!({
        "latitude": 52.52,
        "longitude": 13.419_998,
        "generationtime_ms": 0.05,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "timezone_abbreviation": "GMT",
        "elevation": 38.0,
        "hourly_units": {"time": "unixtime"},
        "hourly": {
            "time": time,
            "temperature_2m": ramp,
            "rain": vec![0.1; n as usize],
            "wind_speed_10m": vec![3.5; n as usize],
            "visibility": vec![24_140.0; n as usize],
            "relative_humidity_2m": vec![85.0; n as usize]
        }
    })
}

/// Daily forecast response with `n` points
fn daily_response(n: i64) -> serde_json::Value {
    let time: Vec<i64> = (0..n).map(|i| JAN_15 + i * 86_400).collect();
    let sunrise: Vec<i64> = time.iter().map(|t| t + 27_900).collect();
    let sunset: Vec<i64> = time.iter().map(|t| t + 57_600).collect();
    serde_json::json!({
        "latitude": 52.52,
        "longitude": 13.419_998,
        "timezone": "GMT",
        "daily": {
            "time": time,
            "temperature_2m_max": vec![8.0; n as usize],
            "temperature_2m_min": vec![2.0; n as usize],
            "rain_sum": vec![1.2; n as usize],
            "wind_speed_10m_max": vec![6.0; n as usize],
            "sunrise": sunrise,
            "sunset": sunset,
            "daylight_duration": vec![29_700.0; n as usize],
            "sunshine_duration": vec![7_200.0; n as usize],
            "uv_index_max": vec![0.9; n as usize]
        }
    })
}

fn geocoding_response() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {"id": 2_950_159, "name": "Berlin", "latitude": 52.524_37, "longitude": 13.410_53, "country": "Germany"},
            {"id": 5_083_330, "name": "Berlin", "latitude": 44.468_67, "longitude": -71.185_08, "country": "United States"}
        ],
        "generationtime_ms": 0.9
    })
}

/// Create a forecast client configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_client(mock_server: &MockServer) -> OpenMeteoClient {
    let config = WeatherConfig {
        base_url: mock_server.uri(),
        timeout_secs: 5,
        ..Default::default()
    };
    #[allow(clippy::expect_used)]
    OpenMeteoClient::new(config).expect("Failed to create client")
}

fn create_geocoding_client(mock_server: &MockServer, cache_ttl_secs: u64) -> OpenMeteoGeocodingClient {
    let config = GeocodingConfig {
        base_url: mock_server.uri(),
        cache_ttl_secs,
        ..GeocodingConfig::for_testing()
    };
    #[allow(clippy::expect_used)]
    OpenMeteoGeocodingClient::new(&config).expect("Failed to create client")
}

/// Setup a mock for the /forecast endpoint with the given response
async fn setup_forecast_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Forecast success scenarios
// ============================================================================

#[tokio::test]
async fn test_fetch_hourly_success() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(hourly_response(168)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(52.52, 13.41).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let samples = result.unwrap();
    assert_eq!(samples.len(), 168);
    for variable in HOURLY_VARIABLES {
        assert!(samples.series(variable).is_ok(), "missing {variable}");
    }
    assert!((samples.series("temperature_2m").unwrap()[5] - 5.0).abs() < f64::EPSILON);
    assert_eq!(samples.axis().start().timestamp(), JAN_15);
}

#[tokio::test]
async fn test_fetch_daily_success() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(daily_response(7)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let samples = client.fetch_daily(52.52, 13.41).await.unwrap();

    assert_eq!(samples.len(), 7);
    for variable in DAILY_VARIABLES {
        assert!(samples.series(variable).is_ok(), "missing {variable}");
    }
    assert_eq!(samples.axis().interval().num_seconds(), 86_400);
}

#[tokio::test]
async fn test_null_values_become_nan() {
    let mock_server = MockServer::start().await;
    let mut body = hourly_response(3);
    body["hourly"]["visibility"] = serde_json::json!([1000.0, null, 3000.0]);
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_json(body)).await;

    let client = create_test_client(&mock_server);
    let samples = client.fetch_hourly(52.52, 13.41).await.unwrap();

    assert!(samples.series("visibility").unwrap()[1].is_nan());
}

// ============================================================================
// Forecast error handling scenarios
// ============================================================================

#[tokio::test]
async fn test_server_error_returns_service_unavailable() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_daily(52.52, 13.41).await;

    assert!(
        matches!(result, Err(WeatherError::ServiceUnavailable(_))),
        "Expected ServiceUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_rate_limit_error() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(429).set_body_string("Rate limit exceeded"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(52.52, 13.41).await;

    assert!(
        matches!(result, Err(WeatherError::RateLimitExceeded)),
        "Expected RateLimitExceeded, got: {result:?}"
    );
}

#[tokio::test]
async fn test_bad_request_is_not_retryable() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Cannot initialize WeatherVariable from invalid String value"
        })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.fetch_hourly(52.52, 13.41).await.unwrap_err();

    assert!(matches!(err, WeatherError::RequestFailed(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("not valid json"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(52.52, 13.41).await;

    assert!(
        matches!(result, Err(WeatherError::ParseError(_))),
        "Expected ParseError, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_block_is_parse_error() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(daily_response(7)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(52.52, 13.41).await;

    assert!(
        matches!(&result, Err(WeatherError::ParseError(msg)) if msg.contains("hourly")),
        "Expected ParseError, got: {result:?}"
    );
}

#[tokio::test]
async fn test_length_mismatch_is_parse_error() {
    let mock_server = MockServer::start().await;
    let mut body = daily_response(7);
    body["daily"]["rain_sum"] = serde_json::json!([1.0, 2.0]);
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_json(body)).await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_daily(52.52, 13.41).await;

    assert!(
        matches!(&result, Err(WeatherError::ParseError(msg)) if msg.contains("rain_sum")),
        "Expected ParseError, got: {result:?}"
    );
}

// ============================================================================
// Input validation scenarios
// ============================================================================

#[tokio::test]
async fn test_invalid_coordinates() {
    let mock_server = MockServer::start().await;

    // No mock mounted - validation fails before any request
    let client = create_test_client(&mock_server);

    assert!(matches!(
        client.fetch_hourly(91.0, 13.41).await,
        Err(WeatherError::InvalidCoordinates)
    ));
    assert!(matches!(
        client.fetch_daily(52.52, 181.0).await,
        Err(WeatherError::InvalidCoordinates)
    ));
}

// ============================================================================
// Query parameter verification
// ============================================================================

#[tokio::test]
async fn test_request_contains_correct_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "52.52"))
        .and(query_param("longitude", "13.41"))
        .and(query_param("hourly", HOURLY_VARIABLES.join(",")))
        .and(query_param("timeformat", "unixtime"))
        .and(query_param("timezone", "GMT"))
        .and(query_param("wind_speed_unit", "ms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_response(24)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(52.52, 13.41).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn test_daily_query_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("daily", DAILY_VARIABLES.join(",")))
        .and(query_param("forecast_days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_response(7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(client.fetch_daily(52.52, 13.41).await.is_ok());
}

// ============================================================================
// Geocoding scenarios
// ============================================================================

#[tokio::test]
async fn test_geocoding_returns_first_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Berlin"))
        .and(query_param("country", "Germany"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_geocoding_client(&mock_server, 0);
    let location = client.search("Berlin", Some("Germany")).await.unwrap();

    assert!((location.latitude - 52.524_37).abs() < 1e-9);
    assert!((location.longitude - 13.410_53).abs() < 1e-9);
    assert_eq!(location.country.as_deref(), Some("Germany"));
}

#[tokio::test]
async fn test_geocoding_without_country_omits_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_geocoding_client(&mock_server, 0);
    client.search("Berlin", Some("")).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(
        requests[0]
            .url
            .query_pairs()
            .all(|(key, _)| key != "country")
    );
}

#[tokio::test]
async fn test_geocoding_empty_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"generationtime_ms": 0.4})),
        )
        .mount(&mock_server)
        .await;

    let client = create_geocoding_client(&mock_server, 0);
    let result = client.search("Atlantis", None).await;

    assert!(
        matches!(&result, Err(GeocodingError::LocationNotFound(name)) if name == "Atlantis"),
        "Expected LocationNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_geocoding_results_are_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_geocoding_client(&mock_server, 3600);
    let first = client.search("Berlin", Some("Germany")).await.unwrap();
    let second = client.search("berlin", Some("GERMANY")).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_geocoding_server_error_is_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_geocoding_client(&mock_server, 0);
    let err = client.search("Berlin", None).await.unwrap_err();

    assert!(matches!(err, GeocodingError::ServiceUnavailable(_)));
    assert!(err.is_retryable());
}
