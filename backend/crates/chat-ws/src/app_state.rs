use crate::{
    ConnectionConfig, ConnectionId, ConnectionRateLimiter, ConnectionRegistry, MessageValidator,
    Metrics, RateLimiterFactory, ShutdownCoordinator, WebSocketConnection,
};

use chat_hub::{BroadcastHub, HubError, Subscription};

use axum::{
    extract::{
        Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use log::{debug, error, info, warn};
use serde::Deserialize;
use tracing::Instrument;

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: BroadcastHub,
    pub registry: ConnectionRegistry,
    pub rate_limiter_factory: RateLimiterFactory,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
    pub validator: MessageValidator,
}

/// Query parameters accepted on the WebSocket endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Resume after this sequence instead of replaying the whole window
    pub since: Option<u64>,
}

/// WebSocket upgrade handler.
///
/// The hub subscription is taken before the upgrade completes, so nothing
/// published while the handshake finishes is lost.
pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    if state.shutdown.is_shutdown() {
        debug!("Refusing WebSocket upgrade during shutdown");
        state.metrics.connection_rejected("shutting_down");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let subscribed = match params.since {
        Some(last_seen) => state.hub.subscribe_from(last_seen).await,
        None => state.hub.subscribe().await,
    };
    let subscription = subscribed.map_err(|e| {
        warn!("Failed to subscribe new connection: {e}");
        state.metrics.connection_rejected(match e {
            HubError::ResourceExhausted { .. } => "subscriber_limit",
            HubError::Closed { .. } => "hub_closed",
        });
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    let subscription_id = subscription.id();

    let connection_id = match state.registry.register(subscription_id, params.since).await {
        Ok(connection_id) => connection_id,
        Err(e) => {
            error!("Failed to register connection: {e}");
            state.hub.unsubscribe(subscription_id).await;
            state.metrics.connection_rejected(e.error_code());
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    info!("Registered connection {connection_id} for subscription {subscription_id}");

    let rate_limiter = state.rate_limiter_factory.create();
    let registry = state.registry.clone();
    let hub = state.hub.clone();

    Ok(ws
        .on_failed_upgrade(move |e| {
            warn!("WebSocket upgrade failed for connection {connection_id}: {e}");
            tokio::spawn(async move {
                registry.unregister(connection_id).await;
                hub.unsubscribe(subscription_id).await;
            });
        })
        .on_upgrade(move |socket| {
            handle_socket(socket, connection_id, subscription, state, rate_limiter)
        }))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(
    socket: WebSocket,
    connection_id: ConnectionId,
    subscription: Subscription,
    state: AppState,
    rate_limiter: ConnectionRateLimiter,
) {
    let span = crate::create_connection_span(&connection_id, &subscription.id());
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        connection_id,
        state.config.clone(),
        state.metrics.clone(),
        rate_limiter,
        state.validator.clone(),
        state.hub.clone(),
    );

    let result = connection
        .handle(socket, subscription, shutdown_guard)
        .instrument(span)
        .await;

    state.registry.unregister(connection_id).await;

    if let Err(e) = result {
        warn!("Connection {connection_id} ended with error: {e}");
    }
}
