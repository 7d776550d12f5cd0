//! HTTP service for adaptive practice sessions.
//!
//! Thin axum handlers over the practice engine in `services`; scoring
//! and mastery math live in the `practice-algo` crate.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use axum::Router;

/// The full application router with tracing and CORS applied.
pub fn create_app(state: state::AppState) -> Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
