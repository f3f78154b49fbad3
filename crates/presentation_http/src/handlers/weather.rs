//! Weather forecast handlers
//!
//! `GET /weather/` reads the request from the query string, `POST /weather/`
//! from a JSON body. Both answer 200 with either the forecast table or the
//! `{"error": [message]}` payload.

use application::ForecastRequest;
use axum::{Json, extract::State};
use domain::TablePayload;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use validator::Validate;

use crate::middleware::{ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// Forecast request parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeatherParams {
    /// City to geocode
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub city: String,

    /// Optional country filter for geocoding
    #[serde(default)]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub country: Option<String>,

    /// `hourly`, `daily` or `weekly`; anything else yields the error payload
    pub period: String,

    /// Accepted for compatibility, currently ignored
    #[serde(default)]
    pub start_date: Option<String>,
}

impl From<WeatherParams> for ForecastRequest {
    fn from(params: WeatherParams) -> Self {
        let mut request = Self::new(params.city, params.period);
        request.country = params.country;
        if let Some(start_date) = params.start_date.filter(|d| !d.is_empty()) {
            request = request.with_start_date(start_date);
        }
        request
    }
}

/// Forecast from query parameters
#[instrument(skip(state))]
pub async fn weather_query(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<WeatherParams>,
) -> Json<TablePayload> {
    report(&state, params).await
}

/// Forecast from a JSON body
#[instrument(skip(state))]
pub async fn weather_json(
    State(state): State<AppState>,
    ValidatedJson(params): ValidatedJson<WeatherParams>,
) -> Json<TablePayload> {
    report(&state, params).await
}

async fn report(state: &AppState, params: WeatherParams) -> Json<TablePayload> {
    let request = ForecastRequest::from(params);
    let payload = state.forecast_service.report(&request).await;
    debug!(
        rows = payload.row_count(),
        error = payload.is_error(),
        "Forecast served"
    );
    Json(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(country: Option<&str>, start_date: Option<&str>) -> WeatherParams {
        WeatherParams {
            city: "Berlin".to_string(),
            country: country.map(str::to_string),
            period: "daily".to_string(),
            start_date: start_date.map(str::to_string),
        }
    }

    #[test]
    fn country_is_passed_through_unchanged() {
        let request = ForecastRequest::from(params(Some(""), None));
        assert_eq!(request.country.as_deref(), Some(""));

        let request = ForecastRequest::from(params(None, None));
        assert_eq!(request.country, None);

        let request = ForecastRequest::from(params(Some("Germany"), None));
        assert_eq!(request.country.as_deref(), Some("Germany"));
    }

    #[test]
    fn start_date_is_carried() {
        let request = ForecastRequest::from(params(None, Some("2024-01-15")));
        assert_eq!(request.start_date.as_deref(), Some("2024-01-15"));
        assert_eq!(request.period, "daily");
        assert_eq!(request.city, "Berlin");
    }

    #[test]
    fn empty_city_fails_validation() {
        let mut p = params(None, None);
        p.city = String::new();
        assert!(p.validate().is_err());
    }

    #[test]
    fn period_is_not_validated_here() {
        let mut p = params(None, None);
        p.period = "monthly".to_string();
        assert!(p.validate().is_ok());
    }
}
