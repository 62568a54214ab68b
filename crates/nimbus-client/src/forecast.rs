//! Views over a forecast series document.

use serde_json::Value;

/// Entries shown in the hourly chart.
pub const HOURLY_ENTRIES: usize = 8;

fn entries(forecast: &Value) -> &[Value] {
    forecast
        .get("list")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// One reading per day: the 12:00 slot of each day in the series.
pub fn daily_midday(forecast: &Value) -> Vec<&Value> {
    entries(forecast)
        .iter()
        .filter(|item| {
            item.get("dt_txt")
                .and_then(Value::as_str)
                .is_some_and(|ts| ts.contains("12:00:00"))
        })
        .collect()
}

/// The first `count` 3-hour readings.
pub fn next_hours(forecast: &Value, count: usize) -> &[Value] {
    let list = entries(forecast);
    &list[..count.min(list.len())]
}
