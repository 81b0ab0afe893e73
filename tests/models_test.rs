//! Deserialization tests for the backend response bodies.

use chrono::{TimeZone, Utc};
use reqwest::StatusCode;

use tickerdash::DashError;
use tickerdash::client::interpret_stock_response;
use tickerdash::models::{SearchResponse, Series, StockDataResponse};

const STOCK_DATA_JSON: &str = include_str!("fixtures/stock_data.json");
const STOCK_DATA_ERROR_JSON: &str = include_str!("fixtures/stock_data_error.json");
const SEARCH_JSON: &str = include_str!("fixtures/search.json");

#[test]
fn test_stock_data_response_deserializes() {
    let response: StockDataResponse =
        serde_json::from_str(STOCK_DATA_JSON).expect("Failed to deserialize stock data");

    assert_eq!(response.ticker.as_deref(), Some("RELIANCE.NS"));
    assert_eq!(response.last_updated.as_deref(), Some("2024-03-01 09:36:12"));
    assert!(response.reported_error().is_none());

    let bars = response.data.expect("data array present");
    assert_eq!(bars.len(), 5);

    let first = &bars[0];
    assert_eq!(
        first.timestamp,
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap()
    );
    assert_eq!(first.open, 2950.0);
    assert_eq!(first.high, 2961.5);
    assert_eq!(first.low, 2948.2);
    assert_eq!(first.close, 2958.4);
    assert_eq!(first.volume, 152_340);
    assert!(first.is_up());
    assert!(!bars[1].is_up());

    let predictions = response.predictions.expect("predictions present");
    assert_eq!(predictions.len(), 2);
    assert_eq!(
        predictions[1].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 45, 0).unwrap()
    );
    assert_eq!(predictions[1].price, 2963.8);
}

#[test]
fn test_fixture_series_is_valid() {
    let response: StockDataResponse = serde_json::from_str(STOCK_DATA_JSON).unwrap();
    let series = Series::new(response.data.unwrap()).expect("fixture bars are ordered");
    assert_eq!(series.len(), 5);
    assert_eq!(series.last().unwrap().close, 2959.6);
}

#[test]
fn test_error_body_is_api_error() {
    let err = interpret_stock_response(StatusCode::NOT_FOUND, STOCK_DATA_ERROR_JSON).unwrap_err();
    match err {
        DashError::Api(message) => assert_eq!(message, "No data found for ticker INVALID.NS"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn test_success_body_interprets() {
    let parsed = interpret_stock_response(StatusCode::OK, STOCK_DATA_JSON).unwrap();
    assert_eq!(parsed.data.map(|d| d.len()), Some(5));
}

#[test]
fn test_rfc3339_timestamps_accepted() {
    let json = r#"{
        "data": [
            {"timestamp": "2024-03-01T09:15:00Z", "open": 10, "high": 11, "low": 9, "close": 10.5}
        ]
    }"#;
    let response: StockDataResponse = serde_json::from_str(json).unwrap();
    let bar = &response.data.unwrap()[0];
    assert_eq!(bar.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap());
    assert_eq!(bar.volume, 0);
}

#[test]
fn test_search_response_deserializes() {
    let response: SearchResponse =
        serde_json::from_str(SEARCH_JSON).expect("Failed to deserialize search results");

    assert_eq!(response.results.len(), 3);
    assert_eq!(response.results[0].symbol, "RELIANCE.NS");
    assert_eq!(
        response.results[0].display_name(),
        "Reliance Industries Limited (RELIANCE.NS)"
    );
}

#[test]
fn test_empty_search_response() {
    let response: SearchResponse = serde_json::from_str("{}").unwrap();
    assert!(response.results.is_empty());
}
