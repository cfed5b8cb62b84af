use crate::{admin, api, health, prometheus};

use chat_ws::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

pub const WS_PATH: &str = "/ws/messages";

/// Build the application router.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn build_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        // WebSocket endpoint
        .route(WS_PATH, get(chat_ws::handler))
        // Replay window over HTTP
        .route("/api/messages", get(api::messages::list_messages))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Admin endpoints
        .route("/admin/shutdown", post(admin::shutdown_handler));

    if let Some(handle) = metrics {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { prometheus::render(&handle) }
            }),
        );
    }

    router.with_state(state).layer(
        ServiceBuilder::new().layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        ),
    )
}
