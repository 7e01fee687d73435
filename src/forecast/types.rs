use serde::Deserialize;
use std::collections::HashMap;

/// Subset of the Open-Meteo forecast payload carrying current conditions.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    pub current: CurrentBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBlock {
    pub temperature_2m: f64,
    pub surface_pressure: f64,
    pub wind_speed_10m: f64,
}

/// Hourly payload: each requested parameter comes back as an array indexed
/// by hour of the local day. The block also carries a `time` axis of ISO
/// strings, so values stay untyped until a specific key is extracted.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyResponse {
    pub hourly: HashMap<String, serde_json::Value>,
}
