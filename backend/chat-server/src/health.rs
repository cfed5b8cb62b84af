use chat_ws::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - component status
pub async fn health_check(State(state): State<AppState>) -> Response {
    let hub_closed = state.hub.is_closed().await;
    let shutting_down = state.shutdown.is_shutdown();

    let health = json!({
        "status": if hub_closed || shutting_down { "shutting_down" } else { "healthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "hub": {
                "status": if hub_closed { "closed" } else { "operational" },
                "subscribers": state.hub.subscriber_count().await,
                "lastSequence": state.hub.last_sequence().await,
                "replayCapacity": state.hub.capacity(),
            },
            "websocket": {
                "connections": state.registry.total_count().await,
                "maxConnections": state.registry.limits().max_total,
                "maxMessageLength": state.validator.max_message_length(),
            },
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe; not ready once shutdown has begun
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    if state.shutdown.is_shutdown() || state.hub.is_closed().await {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}
