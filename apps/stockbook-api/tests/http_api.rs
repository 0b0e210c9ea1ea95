//! Drives the full router in-process against an in-memory store.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use stockbook_api::{router, AppState, JwtManager};
use stockbook_db::{Database, DbConfig};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    router(AppState::new(db, JwtManager::new("test-secret", 3600)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn sign_up(app: &Router, username: &str) -> String {
    let creds = json!({ "username": username, "password": "s3cret" });

    let (status, _) = send(app, Method::POST, "/api/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, Method::POST, "/api/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], username);
    body["token"].as_str().unwrap().to_string()
}

async fn add_product(app: &Router, token: &str, price: i64, quantity: i64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(token),
        Some(json!({
            "name": "Widget",
            "purchase_price_cents": price,
            "quantity": quantity,
            "purchase_date": "2024-05-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_register_and_login() {
    let app = app().await;
    sign_up(&app, "amina").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "amina", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(body["message"], "Username already exists");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "amina", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "ghost", "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/sales", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = JwtManager::new("another-secret", 3600)
        .generate_access_token(1, "amina")
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/metrics", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sell_out_then_oversell() {
    let app = app().await;
    let token = sign_up(&app, "seller").await;
    let product = add_product(&app, &token, 1000, 5).await;

    let (status, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&token),
        Some(json!({ "product_id": product, "quantity": 5, "sale_price_cents": 1500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["total_price_cents"], 7500);
    assert_eq!(sale["purchase_price_cents"], 1000);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&token),
        Some(json!({ "product_id": product, "quantity": 1, "sale_price_cents": 1500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (_, products) = send(&app, Method::GET, "/api/products", Some(&token), None).await;
    assert_eq!(products[0]["quantity"], 0);

    let (_, sales) = send(&app, Method::GET, "/api/sales", Some(&token), None).await;
    assert_eq!(sales.as_array().unwrap().len(), 1);

    let (status, metrics) = send(&app, Method::GET, "/api/metrics", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["total_revenue_cents"], 7500);
    assert_eq!(metrics["total_profit_cents"], 2500);
    assert_eq!(metrics["inventory_value_cents"], 0);
    assert_eq!(metrics["remaining_capital_cents"], 2500);
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let app = app().await;
    let token = sign_up(&app, "seller").await;
    let product = add_product(&app, &token, 1000, 5).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&token),
        Some(json!({ "product_id": product, "quantity": 0, "sale_price_cents": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token),
        Some(json!({ "name": "Bad", "purchase_price_cents": 100, "quantity": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token),
        Some(json!({ "name": "Missing fields" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&token),
        Some(json!({ "product_id": 9_999, "quantity": 1, "sale_price_cents": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_path_and_query_use_error_body() {
    let app = app().await;
    let token = sign_up(&app, "seller").await;

    for (method, uri) in [
        (Method::GET, "/api/products/abc"),
        (Method::DELETE, "/api/products/abc"),
        (Method::GET, "/api/sales/1.5"),
        (Method::GET, "/api/reports/daily?date=2024-05-02&date=2024-05-03"),
    ] {
        let (status, body) = send(&app, method, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], "VALIDATION_ERROR", "{}", uri);
        assert!(body["message"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_unvaluable_stock_is_rejected() {
    let app = app().await;
    let token = sign_up(&app, "seller").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token),
        Some(json!({
            "name": "Bullion",
            "purchase_price_cents": 5_000_000_000_000_000_000_i64,
            "quantity": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, metrics) = send(&app, Method::GET, "/api/metrics", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["inventory_value_cents"], 0);
}

#[tokio::test]
async fn test_delete_is_idempotent_and_history_survives() {
    let app = app().await;
    let token = sign_up(&app, "seller").await;
    let product = add_product(&app, &token, 1000, 5).await;
    let uri = format!("/api/products/{}", product);

    let (_, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&token),
        Some(json!({ "product_id": product, "quantity": 2, "sale_price_cents": 1200 })),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let sale_uri = format!("/api/sales/{}", sale["id"]);
    let (status, stored) = send(&app, Method::GET, &sale_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["product_id"], Value::Null);
    assert_eq!(stored["product_name"], "Widget");
    assert_eq!(stored["total_price_cents"], 2400);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let app = app().await;
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let product = add_product(&app, &alice, 1000, 5).await;
    let uri = format!("/api/products/{}", product);

    let (status, _) = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&bob),
        Some(json!({ "product_id": product, "quantity": 1, "sale_price_cents": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 5);

    let (_, listed) = send(&app, Method::GET, "/api/products", Some(&bob), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_price_edit_keeps_sale_snapshot() {
    let app = app().await;
    let token = sign_up(&app, "seller").await;
    let product = add_product(&app, &token, 1000, 5).await;

    let (_, sale) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(&token),
        Some(json!({ "product_id": product, "quantity": 1, "sale_price_cents": 1500 })),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/api/products/{}", product),
        Some(&token),
        Some(json!({ "purchase_price_cents": 1300 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["purchase_price_cents"], 1300);
    assert_eq!(updated["quantity"], 4);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/products/{}", product),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, stored) = send(
        &app,
        Method::GET,
        &format!("/api/sales/{}", sale["id"]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(stored["purchase_price_cents"], 1000);
}

#[tokio::test]
async fn test_daily_report_filters_by_day() {
    let app = app().await;
    let token = sign_up(&app, "seller").await;
    let product = add_product(&app, &token, 100, 10).await;

    for (date, qty) in [("2024-05-02", 2), ("2024-05-01", 3)] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/sales",
            Some(&token),
            Some(json!({
                "product_id": product,
                "quantity": qty,
                "sale_price_cents": 300,
                "sale_date": date
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, report) = send(
        &app,
        Method::GET,
        "/api/reports/daily?date=2024-05-02",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["date"], "2024-05-02");
    assert_eq!(report["sale_count"], 1);
    assert_eq!(report["revenue_cents"], 600);
    assert_eq!(report["profit_cents"], 400);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/reports/daily?date=May-2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_profile_roundtrip() {
    let app = app().await;
    let token = sign_up(&app, "amina").await;

    let (status, profile) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "amina");
    assert_eq!(profile["full_name"], Value::Null);
    assert!(profile.get("password_hash").is_none());

    let (status, profile) = send(
        &app,
        Method::PUT,
        "/api/profile",
        Some(&token),
        Some(json!({ "full_name": "Amina K", "email": "amina@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["full_name"], "Amina K");
    assert_eq!(profile["email"], "amina@example.com");
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}
