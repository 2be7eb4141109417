// Webhook endpoint integration tests
// Drives the full router (middleware, verifier, dispatcher, in-memory ledger)

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use game_webhook_gateway::{
    config::{Config, WebhookConfig},
    constants::{headers, server::WEBHOOK_PATH},
    router::build_router,
    startup::initialize_app,
    webhooks::{NumericPolicy, SignatureVerifier},
    InMemoryLedger,
};

const SECRET: &str = "integration-secret";

fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        webhook: WebhookConfig {
            secret: SECRET.to_string(),
            signature_header: headers::SIGNATURE.to_string(),
            signature_prefix: None,
            numeric_policy: NumericPolicy::Strict,
        },
        request_timeout: 5,
        max_body_bytes: 4096,
        log_level: None,
        log_json: false,
        ledger_seed: Vec::new(),
    }
}

fn test_app(ledger: InMemoryLedger) -> Router {
    let state = initialize_app(&test_config(), Arc::new(ledger)).unwrap();
    build_router(state)
}

fn sign(body: &[u8]) -> String {
    SignatureVerifier::new(SECRET).unwrap().sign(body)
}

fn webhook_request(body: &[u8], signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .header(headers::SIGNATURE, signature)
        .body(Body::from(body.to_vec()))
        .unwrap()
}

async fn send(app: &Router, body: Value) -> (StatusCode, Value) {
    let raw = body.to_string();
    let response = app
        .clone()
        .oneshot(webhook_request(raw.as_bytes(), &sign(raw.as_bytes())))
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_balance_check_returns_minor_units() {
    let app = test_app(InMemoryLedger::with_accounts([("p1", 10050)]));

    let (status, body) = send(&app, json!({"type": "balance_check", "player_id": "p1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "balance": 10050}));
}

#[tokio::test]
async fn test_bad_signature_is_unauthorized() {
    let app = test_app(InMemoryLedger::with_accounts([("p1", 1000)]));
    let raw = json!({"type": "bet", "player_id": "p1", "amount": 500, "transaction_id": 1})
        .to_string();

    let response = app
        .clone()
        .oneshot(webhook_request(raw.as_bytes(), &"0".repeat(64)))
        .await
        .unwrap();
    assert!(response.headers().contains_key(headers::REQUEST_ID));
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_1001");
    assert!(body.get("request_id").is_none());

    // Nothing was debited
    let (_, body) = send(&app, json!({"type": "balance_check", "player_id": "p1"})).await;
    assert_eq!(body["balance"], 1000);
}

#[tokio::test]
async fn test_missing_signature_is_unauthorized() {
    let app = test_app(InMemoryLedger::new());
    let request = Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .body(Body::from(r#"{"type":"authenticate"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signature_over_reserialized_body_fails() {
    let app = test_app(InMemoryLedger::with_accounts([("p1", 1000)]));
    let sent = br#"{ "type": "authenticate", "player_id": "p1" }"#;
    let reserialized = serde_json::to_vec(&serde_json::from_slice::<Value>(sent).unwrap()).unwrap();

    let response = app
        .oneshot(webhook_request(sent, &sign(&reserialized)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_malformed_body_is_bad_request() {
    let app = test_app(InMemoryLedger::new());

    let bodies: [&[u8]; 3] = [b"not json", b"[1,2,3]", br#"{"amount":"500"}"#];
    for raw in bodies {
        let response = app
            .clone()
            .oneshot(webhook_request(raw, &sign(raw)))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", raw);
        assert!(body["error"]["code"].as_str().unwrap().starts_with("VAL_"));
    }
}

#[tokio::test]
async fn test_bet_win_and_duplicate_delivery() {
    let app = test_app(InMemoryLedger::with_accounts([("p1", 1000)]));
    let bet = json!({
        "type": "bet",
        "player_id": "p1",
        "currency": "USD",
        "amount": 250,
        "transaction_id": 42,
        "round_id": "r-1"
    });

    let (status, body) = send(&app, bet.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "balance": 750}));

    let (status, body) = send(&app, bet).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "success", "balance": 750, "already_processed": true})
    );

    let (_, body) = send(
        &app,
        json!({"type": "win", "player_id": "p1", "amount": 1000, "transaction_id": 42}),
    )
    .await;
    assert_eq!(body, json!({"status": "success", "balance": 1750}));
}

#[tokio::test]
async fn test_business_declines_are_ok_status() {
    let app = test_app(InMemoryLedger::with_accounts([("p1", 100)]));

    let (status, body) = send(
        &app,
        json!({"type": "bet", "player_id": "p1", "amount": 500, "transaction_id": 7}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "error",
            "error_code": "INSUFFICIENT_FUNDS",
            "error_message": "Insufficient funds",
            "balance": 100
        })
    );

    let (status, body) = send(&app, json!({"type": "authenticate", "player_id": "ghost"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "error",
            "error_code": "PLAYER_NOT_FOUND",
            "error_message": "Player not found"
        })
    );
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = test_app(InMemoryLedger::new());
    let raw = br#"{"type":"authenticate","player_id":"x"}"#;

    let response = app.oneshot(webhook_request(raw, &sign(raw))).await.unwrap();
    assert!(response.headers().contains_key(headers::REQUEST_ID));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = test_app(InMemoryLedger::new());
    let raw = vec![b' '; 8192];

    let response = app.oneshot(webhook_request(&raw, &sign(&raw))).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app(InMemoryLedger::new());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn test_metrics_without_recorder_is_unavailable() {
    let app = test_app(InMemoryLedger::new());
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
