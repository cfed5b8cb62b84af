//! Administrative endpoints for server management.

use chat_ws::AppState;

use axum::{extract::State, http::StatusCode};
use log::info;

/// POST /admin/shutdown - begin graceful shutdown.
///
/// Returns immediately; connections are closed and the hub drained by the
/// tasks listening on the shutdown coordinator.
pub async fn shutdown_handler(State(state): State<AppState>) -> StatusCode {
    info!("Graceful shutdown requested via HTTP");

    state.shutdown.shutdown();

    StatusCode::ACCEPTED
}
