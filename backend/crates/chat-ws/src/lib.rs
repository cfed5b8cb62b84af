pub mod app_state;
pub mod connection_config;
pub mod connection_id;
pub mod connection_info;
pub mod connection_limits;
pub mod connection_rate_limiter;
pub mod connection_registry;
pub mod error;
pub mod message_validator;
pub mod metrics;
pub mod rate_limiter_factory;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use app_state::{AppState, ConnectParams, handler};
pub use connection_config::ConnectionConfig;
pub use connection_id::ConnectionId;
pub use connection_info::ConnectionInfo;
pub use connection_limits::ConnectionLimits;
pub use connection_rate_limiter::ConnectionRateLimiter;
pub use connection_registry::ConnectionRegistry;
pub use error::{Result, WsError};
pub use message_validator::MessageValidator;
pub use metrics::Metrics;
pub use chat_config::RateLimitConfig;
pub use rate_limiter_factory::RateLimiterFactory;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::{MAX_VIOLATIONS, WebSocketConnection};

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Tracing span covering one WebSocket connection's lifetime.
pub fn create_connection_span(
    connection_id: &ConnectionId,
    subscription_id: &chat_hub::SubscriptionId,
) -> tracing::Span {
    info_span!(
        "ws_connection",
        connection_id = %connection_id,
        subscription_id = %subscription_id,
    )
}
