//! KMA village forecast client.
//!
//! Fetches short-term forecast records from the Korea Meteorological
//! Administration open-data API. The response is a deeply nested envelope
//! (`response.body.items.item`) wrapping a flat list of category/value pairs.

use serde::Deserialize;

use crate::config::KmaConfig;
use crate::services::slot::ForecastSlot;

/// Fixed paging parameters: one page is plenty for a single-slot fetch.
const PAGE_NO: &str = "1";
const NUM_OF_ROWS: &str = "100";

/// What can go wrong talking to the forecast provider.
///
/// Every variant degrades to the default weather view at the fetch boundary;
/// none of these ever surfaces to an end user. The explicit taxonomy exists
/// so the degrade path is visible in logs and testable.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// Network failure, timeout, or a non-2xx status.
    #[error("forecast provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Body is not JSON, or parses but lacks the expected envelope.
    #[error("malformed forecast response: {0}")]
    MalformedResponse(String),

    /// Well-formed envelope with an empty item list.
    #[error("forecast response contained no records")]
    NoData,
}

/// A single forecast record from the provider item list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ForecastRecord {
    /// Measurement category, e.g. "T1H" (temperature) or "PTY" (precip type).
    pub category: String,
    /// Forecast value as a string; condition categories carry small integer
    /// codes, temperature categories carry the reading.
    #[serde(rename = "fcstValue")]
    pub value: String,
}

// --- KMA JSON envelope ---
//
// All levels are optional so a syntactically valid but structurally wrong
// body maps to MalformedResponse instead of a serde error.

#[derive(Debug, Deserialize)]
struct KmaEnvelope {
    response: Option<KmaResponse>,
}

#[derive(Debug, Deserialize)]
struct KmaResponse {
    body: Option<KmaBody>,
}

#[derive(Debug, Deserialize)]
struct KmaBody {
    items: Option<KmaItems>,
}

#[derive(Debug, Deserialize)]
struct KmaItems {
    #[serde(default)]
    item: Vec<ForecastRecord>,
}

/// Client for the KMA village forecast API.
#[derive(Debug, Clone)]
pub struct KmaClient {
    client: reqwest::Client,
    config: KmaConfig,
}

impl KmaClient {
    pub fn new(config: KmaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self { client, config }
    }

    pub fn config(&self) -> &KmaConfig {
        &self.config
    }

    /// Fetch the raw forecast records for a published slot.
    ///
    /// One bounded GET, no retries: the operation is idempotent and cheap to
    /// repeat on the next request.
    pub async fn fetch_records(
        &self,
        slot: &ForecastSlot,
    ) -> Result<Vec<ForecastRecord>, WeatherError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("serviceKey", self.config.service_key.as_str()),
                ("pageNo", PAGE_NO),
                ("numOfRows", NUM_OF_ROWS),
                ("dataType", "JSON"),
                ("base_date", slot.base_date_param().as_str()),
                ("base_time", slot.base_time_param().as_str()),
                ("nx", self.config.nx.to_string().as_str()),
                ("ny", self.config.ny.to_string().as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::ProviderUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(WeatherError::ProviderUnavailable(format!(
                "provider returned HTTP {}",
                response.status()
            )));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WeatherError::MalformedResponse(format!("JSON parse error: {}", e)))?;

        extract_records(raw)
    }
}

/// Unwrap the `response.body.items.item` envelope into the record list.
///
/// Pure function, split out from the HTTP call so structure handling is
/// testable without a server.
fn extract_records(raw: serde_json::Value) -> Result<Vec<ForecastRecord>, WeatherError> {
    let envelope: KmaEnvelope = serde_json::from_value(raw)
        .map_err(|e| WeatherError::MalformedResponse(format!("unexpected structure: {}", e)))?;

    let items = envelope
        .response
        .and_then(|r| r.body)
        .and_then(|b| b.items)
        .ok_or_else(|| {
            WeatherError::MalformedResponse("missing response.body.items".to_string())
        })?;

    if items.item.is_empty() {
        return Err(WeatherError::NoData);
    }

    Ok(items.item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_records_happy_path() {
        let raw = serde_json::json!({
            "response": {
                "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
                "body": {
                    "dataType": "JSON",
                    "items": {
                        "item": [
                            { "category": "T1H", "fcstValue": "17", "fcstTime": "0600" },
                            { "category": "SKY", "fcstValue": "1", "fcstTime": "0600" }
                        ]
                    }
                }
            }
        });

        let records = extract_records(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "T1H");
        assert_eq!(records[0].value, "17");
        assert_eq!(records[1].category, "SKY");
    }

    #[test]
    fn test_extract_records_missing_body_is_malformed() {
        let raw = serde_json::json!({ "response": { "header": {} } });
        let err = extract_records(raw).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn test_extract_records_wrong_shape_is_malformed() {
        let raw = serde_json::json!({ "response": "oops" });
        let err = extract_records(raw).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedResponse(_)));
    }

    #[test]
    fn test_extract_records_empty_items_is_no_data() {
        let raw = serde_json::json!({
            "response": { "body": { "items": { "item": [] } } }
        });
        let err = extract_records(raw).unwrap_err();
        assert!(matches!(err, WeatherError::NoData));
    }
}
