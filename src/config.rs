use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub forecast_base_url: String,
    pub catalog_path: String,
    pub refresh_interval_secs: u64,
    pub max_city_name_len: usize,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            forecast_base_url: env::var("FORECAST_BASE_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com/v1/forecast".to_string()),
            catalog_path: env::var("CATALOG_PATH").unwrap_or_else(|_| "cities.json".to_string()),
            refresh_interval_secs: parse_or("REFRESH_INTERVAL_SECS", 900)?,
            max_city_name_len: parse_or("MAX_CITY_NAME_LEN", 20)?,
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(var: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{var} must be a number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
