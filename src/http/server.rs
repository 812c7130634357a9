//! HTTP application wiring.
//!
//! # Responsibilities
//! - Create the Axum Router served by the HTTP and HTTPS listeners
//! - Wire up middleware (tracing, timeout, CORS)

use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::cors::cors;

/// Build the router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(middleware::from_fn(cors))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
