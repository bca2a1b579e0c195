//! HTTP routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /submit_order | POST | Render, upload and announce an order |
//! | /health | GET | Liveness |

mod health;
mod orders;

use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/submit_order", post(orders::submit_order))
        .route("/health", get(health::health))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
