//! Question answering form with a persistent answer cache in front of Gemini.

pub mod answer;
pub mod cache;
pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod page;
pub mod state;
pub mod store;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// creating the router with routes
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler).post(handlers::ask_handler))
        .route("/static/script.js", get(handlers::script_handler))
        .route("/test-api", get(handlers::test_api_handler))
        .route("/test-mongo", get(handlers::test_store_handler))
        .route("/view-db", get(handlers::view_db_handler))
        .route("/clear-db", get(handlers::clear_db_handler))
        .route("/list-models", get(handlers::list_models_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
