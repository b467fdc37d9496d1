//! Tests for the submission endpoint.
//!
//! Uses an in-memory record store and MockMirror, so no external services
//! are needed.

use axum::http::StatusCode;
use bytes::Bytes;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::json;

#[tokio::test]
async fn test_submission_is_stored_and_mirrored() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let payload = fixtures::household_submission("Asha", "Bisleri");
    let response = server.post("/api/survey").json(&payload).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "success": true }));

    let rows = ctx.stored_rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Asha");
    assert_eq!(rows[0]["current_brand"], "Bisleri");
    assert_eq!(rows[0]["price_20l"], "40");
    assert_eq!(rows[0]["monthly_20l"], "600");

    assert_eq!(ctx.mirror().forwarded_count(), 1);
}

#[tokio::test]
async fn test_mirror_receives_raw_payload_verbatim() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body = r#"{"type":"Household","name":"Asha","mobile":98765432109876543210,"currentBrand":"Bisleri","clientVersion":"wizard-2","price20l":40.50}"#;

    server
        .post("/api/survey")
        .content_type("application/json")
        .bytes(Bytes::from_static(body.as_bytes()))
        .await
        .assert_status_ok();

    // Unknown keys, key order and large integers survive; nothing is normalized
    let forwarded = ctx.mirror().forwarded_bytes();
    assert_eq!(forwarded, vec![Bytes::from_static(body.as_bytes())]);
    assert_eq!(ctx.stored_rows().await.len(), 1);
}

#[tokio::test]
async fn test_household_row_has_blank_retailer_fields() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/survey")
        .json(&fixtures::household_submission("Asha", "Bisleri"))
        .await
        .assert_status_ok();

    let rows = ctx.stored_rows().await;
    let row = &rows[0];
    assert_eq!(row["type"], "Household");
    assert_eq!(row["retailer_fastest_size"], "");
    assert_eq!(row["retailer_margin"], "");
    assert_eq!(row["retailer_credit"], "");
    assert_eq!(row["retailer_try_hero_agro_foods"], "");
    assert_eq!(row["problems"], "[\"Late delivery\",\"Leakage\"]");
    assert_eq!(row["water_types"], "[\"20L jar\",\"1L bottle\"]");

    // The mirror still sees what the respondent entered
    assert_eq!(ctx.mirror().forwarded()[0]["retailerMargin"], "15%");
}

#[tokio::test]
async fn test_retailer_row_keeps_retailer_fields() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/survey")
        .json(&fixtures::retailer_submission("Ravi Stores", "Kinley"))
        .await
        .assert_status_ok();

    let rows = ctx.stored_rows().await;
    assert_eq!(rows[0]["type"], "Shop / Retailer");
    assert_eq!(rows[0]["retailer_margin"], "12%");
    assert_eq!(rows[0]["retailer_try_hero_agro_foods"], "Maybe");
}

#[tokio::test]
async fn test_missing_type_defaults_to_household() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/survey")
        .json(&json!({ "name": "Minimal" }))
        .await
        .assert_status_ok();

    let rows = ctx.stored_rows().await;
    assert_eq!(rows[0]["type"], "Household");
    assert_eq!(rows[0]["current_brand"], "");
}

#[tokio::test]
async fn test_failing_store_and_mirror_still_succeed() {
    let ctx = TestContext::with_read_only_store(vec![]).await;
    ctx.mirror().set_fail_forward(true);
    let server = ctx.server();

    let response = server
        .post("/api/survey")
        .json(&fixtures::household_submission("Asha", "Bisleri"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    assert!(ctx.stored_rows().await.is_empty());
    assert_eq!(ctx.mirror().forwarded_count(), 0);
}

#[tokio::test]
async fn test_failing_store_does_not_block_mirror() {
    let ctx = TestContext::with_read_only_store(vec![]).await;
    let server = ctx.server();

    server
        .post("/api/survey")
        .json(&fixtures::household_submission("Asha", "Bisleri"))
        .await
        .assert_status_ok();

    assert_eq!(ctx.mirror().forwarded_count(), 1);
}

#[tokio::test]
async fn test_submission_without_mirror_is_stored() {
    let ctx = TestContext::without_mirror();
    let server = ctx.server();

    server
        .post("/api/survey")
        .json(&fixtures::household_submission("Asha", "Bisleri"))
        .await
        .assert_status_ok();

    assert_eq!(ctx.stored_rows().await.len(), 1);
}

#[tokio::test]
async fn test_submission_without_any_sink_succeeds() {
    let ctx = TestContext::without_sinks();
    let server = ctx.server();

    let response = server
        .post("/api/survey")
        .json(&fixtures::household_submission("Asha", "Bisleri"))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_oversized_submission_returns_413() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/survey")
        .json(&fixtures::oversized_submission())
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");

    assert!(ctx.stored_rows().await.is_empty());
    assert_eq!(ctx.mirror().forwarded_count(), 0);
}

#[tokio::test]
async fn test_invalid_json_returns_generic_500() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/survey")
        .content_type("application/json")
        .bytes("{\"name\": \"Asha\"".into())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to process survey");
    assert_eq!(ctx.mirror().forwarded_count(), 0);
}

#[tokio::test]
async fn test_non_object_body_returns_generic_500() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.post("/api/survey").json(&json!(["Asha"])).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to process survey");
    assert!(ctx.stored_rows().await.is_empty());
}

#[tokio::test]
async fn test_overlong_field_is_still_accepted() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let payload = fixtures::overlong_name_submission();
    let response = server.post("/api/survey").json(&payload).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "success": true }));

    let rows = ctx.stored_rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "n".repeat(300));
    assert_eq!(ctx.mirror().forwarded_count(), 1);
    assert_eq!(ctx.mirror().forwarded(), vec![payload]);
}
