//! Provider-boundary tests against a mock KMA server.
//!
//! Pins the degrade-to-default behavior: provider failure, malformed bodies,
//! and empty item lists all yield the fallback weather view and never escape
//! the fetch boundary as errors.

use std::time::Duration;

use chrono::NaiveDate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use closet_home_api::config::KmaConfig;
use closet_home_api::services::kma::{KmaClient, WeatherError};
use closet_home_api::services::slot::{resolve_slot, SlotConvention};
use closet_home_api::services::weather::{current_weather, WeatherView};

fn test_config(base_url: String) -> KmaConfig {
    KmaConfig {
        base_url,
        service_key: "test-key".to_string(),
        nx: 60,
        ny: 127,
        timeout: Duration::from_millis(500),
        convention: SlotConvention::Issuance,
    }
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "response": {
            "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
            "body": {
                "dataType": "JSON",
                "items": {
                    "item": [
                        { "category": "T1H", "fcstValue": "17" },
                        { "category": "PTY", "fcstValue": "1" }
                    ]
                }
            }
        }
    })
}

fn fixed_slot() -> closet_home_api::services::slot::ForecastSlot {
    let now = NaiveDate::from_ymd_opt(2025, 12, 14)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    resolve_slot(now, SlotConvention::Issuance)
}

#[tokio::test]
async fn fetch_sends_expected_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("serviceKey", "test-key"))
        .and(query_param("dataType", "JSON"))
        .and(query_param("pageNo", "1"))
        .and(query_param("numOfRows", "100"))
        .and(query_param("base_date", "20251214"))
        .and(query_param("base_time", "0800"))
        .and(query_param("nx", "60"))
        .and(query_param("ny", "127"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = KmaClient::new(test_config(format!("{}/forecast", server.uri())));
    let records = client.fetch_records(&fixed_slot()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].category, "T1H");
}

#[tokio::test]
async fn current_weather_normalizes_provider_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let client = KmaClient::new(test_config(server.uri()));
    let view = current_weather(&client).await;

    assert_eq!(view.temperature, "17°C");
    assert_eq!(view.condition, "Rain");
    assert_eq!(view.icon, "bi-cloud-rain-fill");
}

#[tokio::test]
async fn server_error_degrades_to_default_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = KmaClient::new(test_config(server.uri()));

    let err = client.fetch_records(&fixed_slot()).await.unwrap_err();
    assert!(matches!(err, WeatherError::ProviderUnavailable(_)));

    assert_eq!(current_weather(&client).await, WeatherView::unknown());
}

#[tokio::test]
async fn timeout_degrades_to_default_view() {
    let server = MockServer::start().await;

    // Response delay well past the 500ms client timeout
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = KmaClient::new(test_config(server.uri()));

    let err = client.fetch_records(&fixed_slot()).await.unwrap_err();
    assert!(matches!(err, WeatherError::ProviderUnavailable(_)));

    assert_eq!(current_weather(&client).await, WeatherView::unknown());
}

#[tokio::test]
async fn non_json_body_degrades_to_default_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = KmaClient::new(test_config(server.uri()));

    let err = client.fetch_records(&fixed_slot()).await.unwrap_err();
    assert!(matches!(err, WeatherError::MalformedResponse(_)));

    assert_eq!(current_weather(&client).await, WeatherView::unknown());
}

#[tokio::test]
async fn json_without_expected_envelope_degrades_to_default_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "unexpected shape" })),
        )
        .mount(&server)
        .await;

    let client = KmaClient::new(test_config(server.uri()));

    let err = client.fetch_records(&fixed_slot()).await.unwrap_err();
    assert!(matches!(err, WeatherError::MalformedResponse(_)));

    assert_eq!(current_weather(&client).await, WeatherView::unknown());
}

#[tokio::test]
async fn empty_item_list_degrades_to_default_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": { "body": { "items": { "item": [] } } }
        })))
        .mount(&server)
        .await;

    let client = KmaClient::new(test_config(server.uri()));

    let err = client.fetch_records(&fixed_slot()).await.unwrap_err();
    assert!(matches!(err, WeatherError::NoData));

    assert_eq!(current_weather(&client).await, WeatherView::unknown());
}
