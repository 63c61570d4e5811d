//! Telemetry/control service: power flag and latest sensor readings, held in memory.

use axum::{routing::get, Router};

pub mod handlers;
pub mod page;
pub mod state;

pub use state::TelemetryState;

/// Full telemetry application, ready to serve.
pub fn build_app(state: TelemetryState) -> Router {
    let router = Router::new()
        .merge(handlers::telemetry_routes())
        .route("/health", get(|| async { "ok" }))
        .with_state(state);
    crate::app::with_http_tracing(router)
}
