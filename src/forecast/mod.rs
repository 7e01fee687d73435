pub mod openmeteo;
pub mod types;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::error::ApiError;

/// Human-facing parameter names accepted by `/weather_at_time`, paired with
/// the provider's internal keys.
pub const WEATHER_PARAMETERS: [(&str, &str); 4] = [
    ("temperature", "temperature_2m"),
    ("humidity", "relative_humidity_2m"),
    ("wind_speed", "wind_speed_10m"),
    ("precipitation", "precipitation"),
];

/// Map requested human-facing names to provider keys, preserving input
/// order. The first unrecognized name fails the whole selection.
pub fn validate_parameter_selection(requested: &[&str]) -> Result<Vec<String>, ApiError> {
    requested
        .iter()
        .map(|&name| {
            WEATHER_PARAMETERS
                .iter()
                .find(|&&(human, _)| human == name)
                .map(|&(_, key)| key.to_string())
                .ok_or_else(|| ApiError::UnknownParameter(name.to_string()))
        })
        .collect()
}

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("request to weather provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("weather provider returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("weather provider response is malformed: {0}")]
    Malformed(String),
    #[error("latitude must be in -90..=90 and longitude in -180..=180")]
    InvalidCoordinates,
}

/// Boundary to the external forecast provider. Implemented by
/// [`openmeteo::OpenMeteoClient`]; tests substitute mocks.
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Instantaneous conditions at the given coordinates, normalized to the
    /// `{temperature, wind_speed, pressure}` mapping.
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<HashMap<String, f64>, ForecastError>;

    /// Hour-resolution series for the current local day, keyed by provider
    /// parameter key. `keys` must already have passed
    /// [`validate_parameter_selection`]; keys the provider omits are simply
    /// absent from the result.
    async fn fetch_hourly_series(
        &self,
        latitude: f64,
        longitude: f64,
        keys: &[String],
    ) -> Result<HashMap<String, Vec<f64>>, ForecastError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_maps_to_provider_keys_in_order() {
        let keys =
            validate_parameter_selection(&["temperature", "humidity", "wind_speed"]).unwrap();
        assert_eq!(
            keys,
            vec!["temperature_2m", "relative_humidity_2m", "wind_speed_10m"]
        );
    }

    #[test]
    fn test_selection_fails_on_first_unknown_name() {
        let err = validate_parameter_selection(&["temperature", "bogus", "also_bad"]).unwrap_err();
        match err {
            ApiError::UnknownParameter(name) => assert_eq!(name, "bogus"),
            other => panic!("expected UnknownParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_is_case_sensitive() {
        let err = validate_parameter_selection(&["Temperature"]).unwrap_err();
        assert!(matches!(err, ApiError::UnknownParameter(_)));
    }

    #[test]
    fn test_empty_selection_is_empty() {
        let keys = validate_parameter_selection(&[]).unwrap();
        assert!(keys.is_empty());
    }
}
