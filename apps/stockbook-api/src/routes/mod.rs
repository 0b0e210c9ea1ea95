//! HTTP route table.
//!
//! ```text
//! POST   /api/register            public
//! POST   /api/login               public
//! GET    /health                  public
//! GET    /api/profile             ─┐
//! PUT    /api/profile              │
//! GET    /api/products             │
//! POST   /api/products             │
//! GET    /api/products/:id         │ bearer token
//! PATCH  /api/products/:id         │ (AuthUser extractor)
//! DELETE /api/products/:id         │
//! GET    /api/sales                │
//! POST   /api/sales                │
//! GET    /api/sales/:id            │
//! GET    /api/metrics              │
//! GET    /api/reports/daily       ─┘
//! ```

pub mod auth;
pub mod health;
pub mod products;
pub mod profile;
pub mod reports;
pub mod sales;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the application router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/:id",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/sales", get(sales::list_sales).post(sales::record_sale))
        .route("/api/sales/:id", get(sales::get_sale))
        .route("/api/metrics", get(reports::metrics))
        .route("/api/reports/daily", get(reports::daily))
        .route("/health", get(health::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
