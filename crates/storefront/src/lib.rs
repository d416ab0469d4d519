//! Verdura Storefront library.
//!
//! This crate provides the storefront edge service as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod upstream;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary; everything else lives here so
/// tests can drive the exact router the binary serves.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .nest("/api", routes::routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}
