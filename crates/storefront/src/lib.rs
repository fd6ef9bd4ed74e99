//! Urban Threadz Storefront library.
//!
//! This crate provides the storefront JSON API as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use state::AppState;

/// Build the storefront router with its session layer.
///
/// Tracing and Sentry layers are added by the binary so tests can drive
/// this router directly.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes::routes()
        .layer(session_layer)
        .layer(CorsLayer::very_permissive())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
