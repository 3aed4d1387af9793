//! Weather-response normalization.
//!
//! Collapses a provider record list into the fixed three-field view the home
//! endpoint renders. The mapping is total: any input, including a failed
//! fetch, yields exactly one fully-populated `WeatherView`.

use chrono::Local;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::kma::{ForecastRecord, KmaClient};
use crate::services::slot::resolve_slot;

/// Shown when no temperature record is present.
const TEMPERATURE_PLACEHOLDER: &str = "-";

/// Condition shown when no recognizable sky/precipitation record is present.
const UNKNOWN_CONDITION: (&str, &str) = ("Unknown", "bi-exclamation-circle-fill");

/// Normalized weather for display. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WeatherView {
    /// Temperature with unit suffix, e.g. "17°C", or "-" when missing
    pub temperature: String,
    /// Human-readable condition label
    pub condition: String,
    /// Bootstrap icon identifier for the condition
    pub icon: String,
}

impl WeatherView {
    /// The all-default view: placeholder temperature, unknown condition.
    pub fn unknown() -> Self {
        Self {
            temperature: TEMPERATURE_PLACEHOLDER.to_string(),
            condition: UNKNOWN_CONDITION.0.to_string(),
            icon: UNKNOWN_CONDITION.1.to_string(),
        }
    }
}

/// PTY (precipitation type) code table.
fn precipitation_condition(code: &str) -> Option<(&'static str, &'static str)> {
    match code {
        "0" => Some(("Clear", "bi-sun-fill")),
        "1" => Some(("Rain", "bi-cloud-rain-fill")),
        "2" => Some(("Snow", "bi-cloud-snow-fill")),
        "3" => Some(("Sleet", "bi-cloud-sleet-fill")),
        "4" => Some(("Thunder", "bi-cloud-lightning-rain-fill")),
        _ => None,
    }
}

/// SKY (sky state) code table.
fn sky_condition(code: &str) -> Option<(&'static str, &'static str)> {
    match code {
        "1" => Some(("Clear", "bi-sun-fill")),
        "3" => Some(("Mostly cloudy", "bi-cloud-fill")),
        "4" => Some(("Overcast", "bi-clouds-fill")),
        _ => None,
    }
}

/// Collapse a record list into a `WeatherView`.
///
/// Single pass. Temperature comes from T1H or T3H with a fixed unit suffix.
/// The condition comes from PTY and SKY: an active (non-zero) precipitation
/// code wins over the sky state, a zero PTY defers to SKY, and a lone zero
/// PTY reads as clear. Unrecognized categories and codes are ignored, so the
/// function never fails — missing data degrades to the unknown defaults.
pub fn normalize(records: &[ForecastRecord]) -> WeatherView {
    let mut temperature: Option<String> = None;
    let mut sky_code: Option<&str> = None;
    let mut pty_code: Option<&str> = None;

    for record in records {
        match record.category.as_str() {
            "T1H" | "T3H" => temperature = Some(format!("{}°C", record.value)),
            "SKY" => sky_code = Some(record.value.as_str()),
            "PTY" => pty_code = Some(record.value.as_str()),
            _ => {}
        }
    }

    let condition = pty_code
        .filter(|&c| c != "0")
        .and_then(precipitation_condition)
        .or_else(|| sky_code.and_then(sky_condition))
        .or_else(|| pty_code.and_then(precipitation_condition))
        .unwrap_or(UNKNOWN_CONDITION);

    WeatherView {
        temperature: temperature.unwrap_or_else(|| TEMPERATURE_PLACEHOLDER.to_string()),
        condition: condition.0.to_string(),
        icon: condition.1.to_string(),
    }
}

/// Fetch and normalize the current weather, degrading to the default view on
/// any provider trouble.
///
/// The slot is recomputed from the wall clock on every call. This is the only
/// place `WeatherError` is consumed: it is logged and swallowed here so the
/// home endpoint always renders.
pub async fn current_weather(client: &KmaClient) -> WeatherView {
    let slot = resolve_slot(Local::now().naive_local(), client.config().convention);

    match client.fetch_records(&slot).await {
        Ok(records) => normalize(&records),
        Err(err) => {
            tracing::warn!(
                "weather fetch failed for base_date={} base_time={}, serving fallback: {}",
                slot.base_date_param(),
                slot.base_time_param(),
                err
            );
            WeatherView::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, value: &str) -> ForecastRecord {
        ForecastRecord {
            category: category.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_normalize_empty_returns_all_defaults() {
        let view = normalize(&[]);
        assert_eq!(view, WeatherView::unknown());
        assert_eq!(view.temperature, "-");
        assert_eq!(view.condition, "Unknown");
        assert_eq!(view.icon, "bi-exclamation-circle-fill");
    }

    #[test]
    fn test_normalize_sky_clear_without_temperature() {
        let view = normalize(&[record("SKY", "1")]);
        assert_eq!(view.temperature, "-");
        assert_eq!(view.condition, "Clear");
        assert_eq!(view.icon, "bi-sun-fill");
    }

    #[test]
    fn test_normalize_unrecognized_sky_code_falls_back() {
        let view = normalize(&[record("T1H", "17"), record("SKY", "9")]);
        assert_eq!(view.temperature, "17°C");
        assert_eq!(view.condition, "Unknown");
        assert_eq!(view.icon, "bi-exclamation-circle-fill");
    }

    #[test]
    fn test_normalize_precipitation_codes() {
        let cases = [
            ("1", "Rain", "bi-cloud-rain-fill"),
            ("2", "Snow", "bi-cloud-snow-fill"),
            ("3", "Sleet", "bi-cloud-sleet-fill"),
            ("4", "Thunder", "bi-cloud-lightning-rain-fill"),
        ];
        for (code, label, icon) in cases {
            let view = normalize(&[record("PTY", code)]);
            assert_eq!(view.condition, label, "PTY {}", code);
            assert_eq!(view.icon, icon, "PTY {}", code);
        }
    }

    #[test]
    fn test_normalize_active_precipitation_wins_over_sky() {
        let view = normalize(&[record("SKY", "4"), record("PTY", "1")]);
        assert_eq!(view.condition, "Rain");
        assert_eq!(view.icon, "bi-cloud-rain-fill");
    }

    #[test]
    fn test_normalize_zero_precipitation_defers_to_sky() {
        let view = normalize(&[record("SKY", "4"), record("PTY", "0")]);
        assert_eq!(view.condition, "Overcast");
        assert_eq!(view.icon, "bi-clouds-fill");
    }

    #[test]
    fn test_normalize_lone_zero_precipitation_reads_clear() {
        let view = normalize(&[record("PTY", "0")]);
        assert_eq!(view.condition, "Clear");
        assert_eq!(view.icon, "bi-sun-fill");
    }

    #[test]
    fn test_normalize_t3h_also_sets_temperature() {
        let view = normalize(&[record("T3H", "-4")]);
        assert_eq!(view.temperature, "-4°C");
    }

    #[test]
    fn test_normalize_unrecognized_categories_ignored() {
        let view = normalize(&[
            record("REH", "80"),
            record("VEC", "230"),
            record("T1H", "21"),
        ]);
        assert_eq!(view.temperature, "21°C");
        assert_eq!(view.condition, "Unknown");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let records = vec![record("T1H", "17"), record("SKY", "3"), record("PTY", "0")];
        let first = normalize(&records);
        let second = normalize(&records);
        assert_eq!(first, second);
    }
}
