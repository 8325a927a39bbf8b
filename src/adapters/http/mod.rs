//! HTTP adapters - REST API implementations.
//!
//! - `console` - staff console JSON API (requests, status, replies)
//! - `middleware` - API key check for the console

pub mod console;
pub mod middleware;

use axum::{routing::get, Router};

pub use console::{console_routes, ConsoleHandlers};

/// Unauthenticated liveness route.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(console::health))
}
