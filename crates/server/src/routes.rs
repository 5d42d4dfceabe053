use std::path::Path;

use axum::{
    middleware,
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::metrics;
use crate::state::AppState;

pub mod inventory;
pub mod suppliers;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn get_metrics() -> (axum::http::StatusCode, String) {
    metrics::encode_metrics()
}

/// Build the full application router: supplier and inventory APIs, health checks, and
/// the static dashboard served from `static_dir`.
pub fn build_router(state: AppState, cors: CorsLayer, static_dir: &str) -> Router {
    let dashboard = ServeFile::new(Path::new(static_dir).join("dashboard.html"));
    let assets = ServeDir::new(static_dir);

    let api = Router::new()
        .route("/suppliers", get(suppliers::list_suppliers).post(suppliers::add_supplier))
        .route("/suppliers/:id", put(suppliers::update_supplier))
        .route("/inventory", get(inventory::get_inventory))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .merge(api)
        .route_service("/", dashboard)
        .fallback_service(assets)
        .layer(middleware::from_fn(metrics::track_duration))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
