//! Route-level tests: access guard, dry-run placement, validation
//! mapping, and the introspection endpoints.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use polymarket_order_service::POLYGON;
use polymarket_order_service::config::{HttpPolicy, Settings};
use polymarket_order_service::order::types::SignatureType;
use polymarket_order_service::service;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use url::Url;

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn settings(shared_secret: Option<&str>) -> Settings {
    Settings {
        clob_host: Url::parse("https://clob.invalid").expect("url"),
        chain_id: POLYGON,
        private_key: Some(SecretString::from(TEST_KEY.to_owned())),
        proxy_address: None,
        signature_type: SignatureType::Eoa,
        dry_run: true,
        api_key: None,
        api_secret: None,
        api_passphrase: None,
        shared_secret: shared_secret.map(|secret| SecretString::from(secret.to_owned())),
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        http: HttpPolicy::default(),
    }
}

async fn router(shared_secret: Option<&str>) -> Router {
    let state = service::app_state(&settings(shared_secret))
        .await
        .expect("state must build");
    service::create_router(state)
}

fn place_order_request(secret: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/place_order")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(secret) = secret {
        builder = builder.header("x-api-key", secret);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request must build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must read");
    serde_json::from_slice(&bytes).expect("body must be json")
}

fn buy_body() -> Value {
    json!({ "market_id": "0xABC", "side": "BUY", "price": 0.55, "size": 10 })
}

#[tokio::test]
async fn dry_run_placement_is_accepted() {
    let app = router(Some("s3cr3t")).await;
    let response = app
        .oneshot(place_order_request(Some("s3cr3t"), buy_body()))
        .await
        .expect("request must run");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["accepted"], true);
    assert_eq!(body["dry_run"], true);
    assert!(body.get("order_id").is_none());
    assert_eq!(body["normalized"]["side"], "BUY");
    assert_eq!(body["normalized"]["price"], "0.55");
    assert_eq!(body["normalized"]["order_type"], "GTC");
}

#[tokio::test]
async fn missing_shared_secret_is_rejected_before_the_builder() {
    let app = router(Some("s3cr3t")).await;
    let response = app
        .oneshot(place_order_request(None, buy_body()))
        .await
        .expect("request must run");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn wrong_shared_secret_is_rejected() {
    let app = router(Some("s3cr3t")).await;
    let response = app
        .oneshot(place_order_request(Some("wrong"), buy_body()))
        .await
        .expect("request must run");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_guard_is_open() {
    let app = router(None).await;
    let response = app
        .oneshot(place_order_request(None, buy_body()))
        .await
        .expect("request must run");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn out_of_range_price_maps_to_bad_request() {
    let app = router(Some("s3cr3t")).await;
    let body = json!({ "market_id": "0xABC", "side": "BUY", "price": 1.2, "size": 10 });
    let response = app
        .oneshot(place_order_request(Some("s3cr3t"), body))
        .await
        .expect("request must run");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn off_grid_price_maps_to_bad_request() {
    let app = router(None).await;
    let body = json!({ "market_id": "0xABC", "side": "BUY", "price": 0.004, "size": 1000 });
    let response = app
        .oneshot(place_order_request(None, body))
        .await
        .expect("request must run");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "precision");
}

#[tokio::test]
async fn health_reports_dry_run_mode() {
    let app = router(None).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request must build"),
        )
        .await
        .expect("request must run");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["dry_run"], true);
}

#[tokio::test]
async fn config_reports_guard_state_without_secrets() {
    let app = router(Some("s3cr3t")).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/config")
                .body(Body::empty())
                .expect("request must build"),
        )
        .await
        .expect("request must run");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["auth_required"], true);
    assert_eq!(body["dry_run"], true);
    assert_eq!(body["signature_type"], 0);
    assert_eq!(body["has_private_key"], true);
    assert!(!body.to_string().contains("s3cr3t"));
    assert!(!body.to_string().contains(&TEST_KEY[2..10]));
}
