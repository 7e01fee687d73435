use chrono::{NaiveTime, Timelike};

/// Index of the hourly sample closest to `target` by wall-clock time.
///
/// Compares the target's minute-of-day against each index's minute
/// equivalent (`i * 60`) and keeps the first minimum, so ties land on the
/// earlier hour. This snaps to hour boundaries; it is not sub-hour
/// interpolation.
pub fn nearest_hour_index(len: usize, target: NaiveTime) -> Option<usize> {
    let target_minutes = i64::from(target.hour() * 60 + target.minute());
    (0..len).min_by_key(|&i| (i as i64 * 60 - target_minutes).abs())
}

/// Value of the hourly sample closest to `target`, or `None` for an empty
/// series.
pub fn nearest_hour_value(series: &[f64], target: NaiveTime) -> Option<f64> {
    nearest_hour_index(series.len(), target).map(|i| series[i])
}

/// Parse an `HH:MM` wall-clock string.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}
