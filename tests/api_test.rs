//! REST API tests against a live server on an ephemeral port.

mod common;

use common::TestServer;
use reqwest::StatusCode;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use stock_records::db::sqlite::StockRecord;
use stock_records::ingest::{ingest_json, IngestMode};

fn acme_payload() -> Value {
    json!({
        "date": "2016-02-16",
        "trade_code": "ACME",
        "high": "36.5",
        "low": "35.0",
        "open": "36.0",
        "close": "35.8",
        "volume": "4,52,069"
    })
}

async fn list(server: &TestServer) -> Vec<StockRecord> {
    let response = server
        .client
        .get(server.url("/stocks/api/stocks/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

async fn create(server: &TestServer, payload: &Value) -> reqwest::Response {
    server
        .client
        .post(server.url("/stocks/api/stocks/create/"))
        .json(payload)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await;

    let response = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn test_list_starts_empty() {
    let server = TestServer::start().await;
    assert!(list(&server).await.is_empty());
}

#[tokio::test]
async fn test_create_then_list_contains_record_once() {
    let server = TestServer::start().await;

    let response = create(&server, &acme_payload()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: StockRecord = response.json().await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.volume, 452069);
    assert_eq!(created.high, dec!(36.5));

    let records = list(&server).await;
    assert_eq!(records.iter().filter(|r| r.id == created.id).count(), 1);
    assert_eq!(records[0], created);
}

#[tokio::test]
async fn test_create_serializes_prices_as_strings() {
    let server = TestServer::start().await;

    let body: Value = create(&server, &acme_payload()).await.json().await.unwrap();
    assert_eq!(body["date"], "2016-02-16");
    assert_eq!(body["high"], "36.5");
    assert_eq!(body["low"], "35.0");
    assert_eq!(body["volume"], 452069);
}

#[tokio::test]
async fn test_create_missing_trade_code_is_rejected() {
    let server = TestServer::start().await;
    let mut payload = acme_payload();
    payload.as_object_mut().unwrap().remove("trade_code");

    let response = create(&server, &payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(server.state.sqlite.count_stock_records().unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_bad_values() {
    let server = TestServer::start().await;

    for (field, value) in [
        ("date", json!("16/02/2016")),
        ("trade_code", json!("")),
        ("high", json!("n/a")),
        ("volume", json!("12.5")),
    ] {
        let mut payload = acme_payload();
        payload[field] = value;

        let response = create(&server, &payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {}", field);
    }

    let response = server
        .client
        .post(server.url("/stocks/api/stocks/create/"))
        .header("content-type", "application/json")
        .body("{\"date\":")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(server.state.sqlite.count_stock_records().unwrap(), 0);
}

#[tokio::test]
async fn test_put_replaces_all_fields() {
    let server = TestServer::start().await;
    let created: StockRecord = create(&server, &acme_payload()).await.json().await.unwrap();

    let response = server
        .client
        .put(server.url(&format!("/stocks/api/stocks/{}/update/", created.id)))
        .json(&json!({
            "id": created.id + 100,
            "date": "2016-02-17",
            "trade_code": "ACMEX",
            "high": 40,
            "low": "38.25",
            "open": "39",
            "close": 39.5,
            "volume": 1000
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: StockRecord = response.json().await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.trade_code, "ACMEX");
    assert_eq!(updated.date.to_string(), "2016-02-17");
    assert_eq!(updated.high, dec!(40));
    assert_eq!(updated.low, dec!(38.25));
    assert_eq!(updated.close, dec!(39.5));
    assert_eq!(updated.volume, 1000);

    let records = list(&server).await;
    assert_eq!(records, vec![updated]);
}

#[tokio::test]
async fn test_put_errors() {
    let server = TestServer::start().await;

    let response = server
        .client
        .put(server.url("/stocks/api/stocks/999/update/"))
        .json(&acme_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");

    let created: StockRecord = create(&server, &acme_payload()).await.json().await.unwrap();
    let response = server
        .client
        .put(server.url(&format!("/stocks/api/stocks/{}/update/", created.id)))
        .json(&json!({ "close": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(list(&server).await, vec![created]);
}

#[tokio::test]
async fn test_missing_record_wins_over_bad_body() {
    let server = TestServer::start().await;
    let url = server.url("/stocks/api/stocks/999/update/");

    let response = server
        .client
        .put(&url)
        .json(&json!({ "close": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");

    let response = server
        .client
        .patch(&url)
        .json(&json!({ "close": "not a number" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_changes_only_given_fields() {
    let server = TestServer::start().await;
    let created: StockRecord = create(&server, &acme_payload()).await.json().await.unwrap();

    let response = server
        .client
        .patch(server.url(&format!("/stocks/api/stocks/{}/update/", created.id)))
        .json(&json!({ "close": "36.1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: StockRecord = response.json().await.unwrap();
    assert_eq!(updated.close, dec!(36.1));
    assert_eq!(updated.high, created.high);
    assert_eq!(updated.trade_code, created.trade_code);
    assert_eq!(updated.id, created.id);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let server = TestServer::start().await;
    let created: StockRecord = create(&server, &acme_payload()).await.json().await.unwrap();
    let url = server.url(&format!("/stocks/api/stocks/{}/delete/", created.id));

    let response = server.client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(list(&server).await.is_empty());

    let response = server.client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let server = TestServer::start().await;

    let response = server
        .client
        .delete(server.url("/stocks/api/stocks/abc/delete/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ingested_records_are_listed() {
    let server = TestServer::start().await;
    let json = r#"[
        {"date":"2016-02-16","trade_code":"ACME","high":"36.5","low":"35.0","open":"36.0","close":"35.8","volume":"4,52,069"},
        {"date":"2016-02-16","trade_code":"BIG","high":"1,234.50","low":"1,200","open":"1,210","close":"1,230.75","volume":"12,000"}
    ]"#;

    ingest_json(&server.state.sqlite, json, IngestMode::Atomic).unwrap();

    let records = list(&server).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].trade_code, "ACME");
    assert_eq!(records[0].volume, 452069);
    assert_eq!(records[1].high, dec!(1234.50));
    assert_eq!(records[1].close, dec!(1230.75));
    assert_eq!(records[1].volume, 12000);
}
