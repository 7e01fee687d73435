use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use super::types::{CurrentResponse, HourlyResponse};
use super::{ForecastClient, ForecastError};
use crate::config::Config;

/// Provider keys requested for the current-conditions snapshot.
const CURRENT_KEYS: &str = "temperature_2m,surface_pressure,wind_speed_10m";

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .user_agent("WeatherTrackerServer/1.0")
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.forecast_base_url.clone(),
        }
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidCoordinates);
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, ForecastError> {
        let response = self.client.get(&self.base_url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ForecastError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<HashMap<String, f64>, ForecastError> {
        Self::validate_coordinates(latitude, longitude)?;
        tracing::debug!(lat = latitude, lon = longitude, "fetching current weather");

        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let parsed: CurrentResponse = self
            .get_json(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("current", CURRENT_KEYS),
                ("forecast_days", "1"),
            ])
            .await?;

        let current = parsed.current;
        Ok(HashMap::from([
            ("temperature".to_string(), current.temperature_2m),
            ("wind_speed".to_string(), current.wind_speed_10m),
            ("pressure".to_string(), current.surface_pressure),
        ]))
    }

    async fn fetch_hourly_series(
        &self,
        latitude: f64,
        longitude: f64,
        keys: &[String],
    ) -> Result<HashMap<String, Vec<f64>>, ForecastError> {
        Self::validate_coordinates(latitude, longitude)?;
        tracing::debug!(lat = latitude, lon = longitude, ?keys, "fetching hourly series");

        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let hourly = keys.join(",");
        // timezone=auto aligns array indices to the location's local hours;
        // forecast_days=1 bounds the series to the current day.
        let parsed: HourlyResponse = self
            .get_json(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("hourly", hourly.as_str()),
                ("timezone", "auto"),
                ("forecast_days", "1"),
            ])
            .await?;

        let mut series = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(values) = parsed.hourly.get(key) {
                let values: Vec<f64> = serde_json::from_value(values.clone())
                    .map_err(|e| ForecastError::Malformed(format!("hourly.{key}: {e}")))?;
                series.insert(key.clone(), values);
            }
        }
        Ok(series)
    }
}
