pub mod cache;
pub mod config;
pub mod directory;
pub mod handlers;
pub mod lookup;
pub mod openapi;
pub mod sequence;
pub mod service;
pub mod static_data;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: handlers::AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/cities/search", get(handlers::search))
        .route("/api/cities/lookup", get(handlers::lookup))
        .route("/api/cities/static", get(handlers::static_cities))
        .route("/api/cities/dynamic", get(handlers::dynamic_cities))
        .route("/api/cities/stats", get(handlers::stats))
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
