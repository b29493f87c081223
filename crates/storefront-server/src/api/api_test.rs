use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::Value;
use storefront_core::KeywordClassifier;
use tower::ServiceExt;

use super::*;
use crate::backend::fake::FakeBackend;
use crate::test_support::catalog;

fn test_state() -> (AppState, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend::new(catalog()));
    let state = AppState {
        catalog: CatalogStore::new(catalog()),
        sessions: SessionStore::new(),
        backend: Arc::clone(&backend) as Arc<dyn StorefrontBackend>,
        classifier: Arc::new(KeywordClassifier),
        success_display: Duration::ZERO,
    };
    (state, backend)
}

fn test_app() -> Router {
    build_app(test_state().0, default_rate_limit_state())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json parse")
    };
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("validation_error", StatusCode::BAD_REQUEST),
        ("bad_request", StatusCode::BAD_REQUEST),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("upstream_error", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

// -------------------------------------------------------------------------
// Catalog routes
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_catalog_size_and_request_id() {
    let app = test_app();
    let request = Request::builder()
        .uri("/api/v1/health")
        .header(REQUEST_ID_HEADER, "health-1")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "health-1");
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["products"], 2);
    assert_eq!(json["meta"]["request_id"], "health-1");
}

#[tokio::test]
async fn shop_includes_collections() {
    let (status, json) = get_json(&test_app(), "/api/v1/shop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Demo Store");
    assert_eq!(json["data"]["collections"][0]["handle"], "featured");
}

#[tokio::test]
async fn categories_lists_all_first_and_only_matched_labels() {
    let (status, json) = get_json(&test_app(), "/api/v1/categories").await;
    assert_eq!(status, StatusCode::OK);

    let labels: Vec<&str> = json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|c| c["label"].as_str())
        .collect();
    assert_eq!(labels, ["all", "clothing", "graphics cards"]);
    assert_eq!(json["data"][2]["display_name"], "Graphics cards");
}

#[tokio::test]
async fn products_filter_by_category() {
    let app = test_app();

    let (_, json) = get_json(&app, "/api/v1/products?category=clothing").await;
    let products = json["data"]["products"].as_array().expect("products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["handle"], "classic-tee");
    assert_eq!(products[0]["price"], "$18.00");
    assert_eq!(products[0]["image"]["alt_text"], "Classic Tee");

    let (_, json) = get_json(&app, "/api/v1/products").await;
    assert_eq!(json["data"]["category"], "all");
    assert_eq!(json["data"]["products"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn unknown_category_returns_every_product() {
    let (status, json) = get_json(&test_app(), "/api/v1/products?category=furniture").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["category"], "all");
    assert_eq!(json["data"]["products"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn product_detail_includes_option_picker() {
    let (status, json) = get_json(&test_app(), "/api/v1/products/classic-tee").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["has_size_options"], true);
    assert!(json["data"]["default_variant_id"].is_null());
    assert_eq!(json["data"]["options"][0]["name"], "Size");
    assert_eq!(json["data"]["variants"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn product_detail_unknown_handle_is_404() {
    let (status, json) = get_json(&test_app(), "/api/v1/products/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

// -------------------------------------------------------------------------
// Quick-view routes
// -------------------------------------------------------------------------

async fn open_tee(app: &Router, on_success: &str) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/v1/quick-view",
        Some(serde_json::json!({ "handle": "classic-tee", "on_success": on_success })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["data"]["id"].as_str().expect("id").to_owned()
}

#[tokio::test]
async fn quick_view_select_and_add_to_bag() {
    let (state, backend) = test_state();
    let app = build_app(state, default_rate_limit_state());
    let id = open_tee(&app, "reset").await;

    let (status, json) = send(&app, Method::POST, &format!("/api/v1/quick-view/{id}/bag"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["bag"]["status"], "idle");
    assert_eq!(json["data"]["can_add_to_bag"], false);

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/quick-view/{id}/options"),
        Some(serde_json::json!({ "name": "Size", "value": "M" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["variant"]["id"], "tee-m");
    assert_eq!(json["data"]["selection"]["Size"], "M");

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/v1/quick-view/{id}/bag?quantity=2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["bag"]["status"], "submitting");

    let mut cart = Value::Null;
    for _ in 0..100 {
        let (_, json) = get_json(&app, &format!("/api/v1/quick-view/{id}")).await;
        if json["data"]["bag"]["status"] == "idle" && !json["data"]["cart"].is_null() {
            cart = json["data"]["cart"].clone();
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(cart["total_quantity"], 2);
    assert_eq!(
        backend.cart_calls.load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn quick_view_rejects_unknown_option_value() {
    let app = test_app();
    let id = open_tee(&app, "close").await;

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/quick-view/{id}/options"),
        Some(serde_json::json!({ "name": "Size", "value": "XXL" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn quick_view_zero_quantity_is_rejected() {
    let app = test_app();
    let id = open_tee(&app, "close").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/quick-view/{id}/bag?quantity=0"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quick_view_close_then_404() {
    let app = test_app();
    let id = open_tee(&app, "close").await;

    let (status, json) = send(&app, Method::DELETE, &format!("/api/v1/quick-view/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["closed"], true);

    let (status, _) = get_json(&app, &format!("/api/v1/quick-view/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/quick-view/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quick_view_open_unknown_handle_is_404() {
    let (status, _) = send(
        &test_app(),
        Method::POST,
        "/api/v1/quick-view",
        Some(serde_json::json!({ "handle": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quick_view_routes_are_rate_limited_but_catalog_is_not() {
    let app = build_app(test_state().0, RateLimitState::new(1, Duration::from_secs(60)));
    let id = open_tee(&app, "close").await;

    let (status, json) = get_json(&app, &format!("/api/v1/quick-view/{id}")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"]["code"], "rate_limited");

    let (status, _) = get_json(&app, "/api/v1/products").await;
    assert_eq!(status, StatusCode::OK);
}
