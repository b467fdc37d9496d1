//! Tests for the HTTP mirror client against a local stub sheet.

use axum::http::StatusCode;
use axum_test::TestServer;
use bytes::Bytes;
use api::{router, AppState};
use integration_tests::{
    fixtures,
    stub::{Listing, StubSheet},
};
use serde_json::{json, Value};
use sheet_mirror::{ResponseMirror, SheetMirror};
use std::sync::Arc;

#[tokio::test]
async fn test_forward_posts_payload() {
    let stub = StubSheet::start().await;
    let mirror = SheetMirror::new(&stub.url, None).unwrap();

    let payload = fixtures::household_submission("Asha", "Bisleri");
    let body = Bytes::from(serde_json::to_vec(&payload).unwrap());
    mirror.forward(body).await.unwrap();

    assert_eq!(stub.appended(), vec![payload]);
}

#[tokio::test]
async fn test_forward_sends_body_unchanged() {
    let stub = StubSheet::start().await;
    let mirror = SheetMirror::new(&stub.url, None).unwrap();

    // Key order, spacing and integers past f64 precision must all survive
    let body = r#"{"name":"Asha", "mobile":98765432109876543210,"area":"Baner","amount":1.10}"#;
    mirror.forward(Bytes::from_static(body.as_bytes())).await.unwrap();

    let appended = stub.appended_raw();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].body, body.as_bytes());
    assert_eq!(appended[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_forward_rejected_status_is_error() {
    let stub = StubSheet::start().await;
    stub.set_append_status(StatusCode::INTERNAL_SERVER_ERROR);
    let mirror = SheetMirror::new(&stub.url, None).unwrap();

    let err = mirror
        .forward(Bytes::from_static(br#"{"name":"Asha"}"#))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), Some("MIRROR_002"));
}

#[tokio::test]
async fn test_fetch_all_reads_listing() {
    let stub = StubSheet::start().await;
    stub.set_listing(Listing::Records(vec![
        fixtures::sheet_record("Bisleri", "Leakage", "Kothrud", "600", "Household"),
    ]));
    let mirror = SheetMirror::new(&stub.url, None).unwrap();

    let records = mirror.fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["current_brand_"], "Bisleri");
}

#[tokio::test]
async fn test_fetch_all_error_cases() {
    let stub = StubSheet::start().await;
    let mirror = SheetMirror::new(&stub.url, None).unwrap();

    stub.set_listing(Listing::Status(StatusCode::BAD_GATEWAY));
    let err = mirror.fetch_all().await.unwrap_err();
    assert_eq!(err.error_code(), Some("MIRROR_002"));

    stub.set_listing(Listing::Body(json!({ "result": "error", "error": "quota" })));
    let err = mirror.fetch_all().await.unwrap_err();
    assert_eq!(err.error_code(), Some("MIRROR_003"));
}

#[tokio::test]
async fn test_unreachable_mirror_is_transport_error() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mirror = SheetMirror::new(&format!("http://{}/exec", addr), None).unwrap();
    let err = mirror.fetch_all().await.unwrap_err();
    assert_eq!(err.error_code(), Some("MIRROR_001"));
}

#[tokio::test]
async fn test_router_with_sheet_mirror_end_to_end() {
    let stub = StubSheet::start().await;
    let mirror: Arc<dyn ResponseMirror> = Arc::new(SheetMirror::new(&stub.url, None).unwrap());
    let server = TestServer::new(router(AppState::new(None, Some(mirror), "test"))).unwrap();

    let body = r#"{"type":"Shop / Retailer","name":"Ravi Stores","mobile":98765432109876543210,"currentBrand":"Kinley"}"#;
    server
        .post("/api/survey")
        .content_type("application/json")
        .bytes(Bytes::from_static(body.as_bytes()))
        .await
        .assert_status_ok();
    let appended = stub.appended_raw();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].body, body.as_bytes());

    // A non-array listing falls through to an empty summary without a store
    stub.set_listing(Listing::Body(json!({ "result": "error" })));
    let body: Value = server.get("/api/responses").await.json();
    assert_eq!(body["total"], 0);

    stub.set_listing(Listing::Records(vec![
        fixtures::sheet_record("Kinley", "Low margin", "Aundh", "250", "Shop / Retailer"),
    ]));
    let body: Value = server.get("/api/responses").await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["localityAnalysis"], json!([{ "area": "Aundh", "avgSpend": "250.00" }]));
}
