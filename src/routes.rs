use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ApiError;
use crate::forecast::{validate_parameter_selection, ForecastClient};
use crate::registry::register_city;
use crate::resolve::{nearest_hour_value, parse_clock_time};
use crate::store::CatalogStore;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<CatalogStore>,
    pub forecast: Arc<dyn ForecastClient>,
}

// Request/Response types
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddCityRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct CityResponse {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherAtTimeQuery {
    pub city_name: String,
    pub time: String,
    pub parameters: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

// Route handlers
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Current conditions at arbitrary coordinates. Nothing is persisted.
pub async fn current_weather(
    State(state): State<AppState>,
    Query(params): Query<CurrentWeatherQuery>,
) -> Result<Json<HashMap<String, f64>>, ApiError> {
    let weather = state
        .forecast
        .fetch_current(params.latitude, params.longitude)
        .await?;
    Ok(Json(weather))
}

/// Register a city and answer with its freshly fetched weather.
pub async fn add_city(
    State(state): State<AppState>,
    Json(request): Json<AddCityRequest>,
) -> Result<Json<CityResponse>, ApiError> {
    let city = register_city(
        &state.store,
        state.forecast.as_ref(),
        &state.config,
        &request.name,
        request.latitude,
        request.longitude,
    )
    .await?;

    Ok(Json(CityResponse {
        name: request.name,
        latitude: city.latitude(),
        longitude: city.longitude(),
        weather: city.weather,
    }))
}

/// Names of all tracked cities, in registration order.
pub async fn cities(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let catalog = state.store.load().await?;
    Ok(Json(catalog.cities.keys().cloned().collect()))
}

/// Weather for a tracked city at the nearest hour of the current local day.
pub async fn weather_at_time(
    State(state): State<AppState>,
    Query(params): Query<WeatherAtTimeQuery>,
) -> Result<Json<IndexMap<String, f64>>, ApiError> {
    let catalog = state.store.load().await?;
    let city = catalog.cities.get(&params.city_name).ok_or_else(|| {
        ApiError::NotFound(format!("city '{}' is not tracked", params.city_name))
    })?;

    let target = parse_clock_time(&params.time).ok_or_else(|| {
        ApiError::Validation(format!("time '{}' is not in HH:MM format", params.time))
    })?;

    let requested: Vec<&str> = params.parameters.split(',').map(str::trim).collect();
    let keys = validate_parameter_selection(&requested)?;

    let series_by_key = state
        .forecast
        .fetch_hourly_series(city.latitude(), city.longitude(), &keys)
        .await?;

    let mut result = IndexMap::with_capacity(keys.len());
    for key in &keys {
        let value = series_by_key
            .get(key)
            .and_then(|series| nearest_hour_value(series, target))
            .ok_or_else(|| ApiError::NotFound(format!("no hourly data for parameter '{key}'")))?;
        result.insert(key.clone(), value);
    }
    Ok(Json(result))
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/current_weather", get(current_weather))
        .route("/add_city", post(add_city))
        .route("/cities", get(cities))
        .route("/weather_at_time", get(weather_at_time))
        .with_state(state)
}
