//! HTTP routes.

mod cart;
mod dashboard;
mod extract;
mod order;

use axum::{routing::{get, post, put}, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront"})) }))
        .route("/api/v1/cart/:session", get(cart::get_cart).delete(cart::clear_cart))
        .route("/api/v1/cart/:session/items", post(cart::add_item))
        .route("/api/v1/cart/:session/items/:variant_id", put(cart::update_quantity).delete(cart::remove_item))
        .route("/api/v1/cart/:session/checkout", post(cart::checkout))
        .route("/api/v1/orders", get(order::list_orders).post(order::create_order))
        .route("/api/v1/orders/:id", get(order::get_order))
        .route("/api/v1/orders/:id/status", put(order::update_status))
        .route("/api/v1/dashboard/stats", get(dashboard::stats))
        .route("/api/v1/dashboard/chart", get(dashboard::chart))
        .route("/api/v1/dashboard/top-products", get(dashboard::top_products))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
