use tracing::warn;

use crate::config::Config;
use crate::error::ApiError;
use crate::forecast::ForecastClient;
use crate::store::{CatalogStore, TrackedLocation};

/// Register a new tracked city: validate the name, persist the entry with
/// empty weather, then populate it with an immediate current-weather fetch.
///
/// A failed immediate fetch is surfaced to the caller but does NOT roll the
/// registration back — the city stays tracked with empty weather and the
/// next scheduled refresh picks it up.
pub async fn register_city(
    store: &CatalogStore,
    client: &dyn ForecastClient,
    config: &Config,
    name: &str,
    latitude: f64,
    longitude: f64,
) -> Result<TrackedLocation, ApiError> {
    if name.is_empty() {
        return Err(ApiError::Validation(
            "city name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > config.max_city_name_len {
        return Err(ApiError::Validation(format!(
            "city name must be at most {} characters",
            config.max_city_name_len
        )));
    }

    let mut catalog = store.load().await?;
    if catalog.cities.contains_key(name) {
        return Err(ApiError::Validation(format!(
            "city '{name}' is already tracked"
        )));
    }
    catalog
        .cities
        .insert(name.to_string(), TrackedLocation::new(latitude, longitude));
    store.save(&catalog).await?;

    let weather = match client.fetch_current(latitude, longitude).await {
        Ok(weather) => weather,
        Err(e) => {
            warn!(city = name, error = %e, "initial weather fetch failed; city stays tracked");
            return Err(e.into());
        }
    };

    // Re-load before the write-back: another writer may have touched the
    // catalog while the fetch was in flight.
    let mut catalog = store.load().await?;
    if let Some(city) = catalog.cities.get_mut(name) {
        city.weather = weather.clone();
    }
    store.save(&catalog).await?;

    Ok(TrackedLocation {
        coordinates: [latitude, longitude],
        weather,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tempfile::tempdir;

    struct MockForecast {
        fail: bool,
    }

    #[async_trait]
    impl ForecastClient for MockForecast {
        async fn fetch_current(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<HashMap<String, f64>, ForecastError> {
            if self.fail {
                return Err(ForecastError::Malformed("truncated body".to_string()));
            }
            Ok(HashMap::from([
                ("temperature".to_string(), 17.5),
                ("wind_speed".to_string(), 3.1),
                ("pressure".to_string(), 1011.0),
            ]))
        }

        async fn fetch_hourly_series(
            &self,
            _latitude: f64,
            _longitude: f64,
            _keys: &[String],
        ) -> Result<HashMap<String, Vec<f64>>, ForecastError> {
            Ok(HashMap::new())
        }
    }

    fn test_config() -> Config {
        Config {
            bind_addr: "127.0.0.1:0".to_string(),
            forecast_base_url: "http://localhost/v1/forecast".to_string(),
            catalog_path: "cities.json".to_string(),
            refresh_interval_secs: 900,
            max_city_name_len: 20,
            http_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_register_populates_weather_and_persists() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("cities.json"));
        let client = MockForecast { fail: false };

        let city = register_city(&store, &client, &test_config(), "Berlin", 52.52, 13.41)
            .await
            .unwrap();

        assert_eq!(city.coordinates, [52.52, 13.41]);
        assert_eq!(city.weather["temperature"], 17.5);

        let catalog = store.load().await.unwrap();
        assert_eq!(catalog.cities["Berlin"].weather["pressure"], 1011.0);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_without_catalog_change() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("cities.json"));
        let client = MockForecast { fail: false };
        let config = test_config();

        register_city(&store, &client, &config, "Moscow", 55.75, 37.62)
            .await
            .unwrap();
        let before = store.load().await.unwrap();

        let err = register_city(&store, &client, &config, "Moscow", 1.0, 2.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let after = store.load().await.unwrap();
        assert_eq!(after.cities.len(), before.cities.len());
        // The original coordinates survived the rejected attempt.
        assert_eq!(after.cities["Moscow"].coordinates, [55.75, 37.62]);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_city_tracked_with_empty_weather() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("cities.json"));
        let client = MockForecast { fail: true };

        let err = register_city(&store, &client, &test_config(), "Lima", -12.05, -77.04)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));

        let catalog = store.load().await.unwrap();
        assert!(catalog.cities.contains_key("Lima"));
        assert!(catalog.cities["Lima"].weather.is_empty());
    }

    #[tokio::test]
    async fn test_empty_and_oversized_names_are_rejected() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("cities.json"));
        let client = MockForecast { fail: false };
        let config = test_config();

        let err = register_city(&store, &client, &config, "", 0.0, 0.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let long_name = "x".repeat(21);
        let err = register_city(&store, &client, &config, &long_name, 0.0, 0.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(store.load().await.unwrap().cities.is_empty());
    }
}
