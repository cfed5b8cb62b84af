use chat_config::Config;
use chat_hub::{BroadcastHub, HubConfig};
use chat_ws::{
    AppState, ConnectionConfig, ConnectionLimits, ConnectionRegistry, MessageValidator, Metrics,
    RateLimiterFactory, ShutdownCoordinator,
};

use log::info;
use tokio::task::JoinHandle;

/// Hub settings from the `[hub]` config section
pub fn hub_config(config: &Config) -> HubConfig {
    HubConfig {
        replay_capacity: config.hub.replay_capacity,
        queue_capacity: config.hub.queue_capacity,
        max_subscribers: config.hub.max_subscribers,
    }
}

/// Assemble the shared state for every route from validated config
pub fn build_app_state(
    config: &Config,
    hub: BroadcastHub,
    shutdown: ShutdownCoordinator,
) -> AppState {
    AppState {
        hub,
        registry: ConnectionRegistry::new(ConnectionLimits::from(&config.server)),
        rate_limiter_factory: RateLimiterFactory::new(config.rate_limit.clone()),
        metrics: Metrics::new(),
        shutdown,
        config: ConnectionConfig::from(&config.websocket),
        validator: MessageValidator::from(&config.validation),
    }
}

/// Close the hub once shutdown is triggered, so every subscription drains
/// what it already holds and its connection ends.
pub fn spawn_hub_closer(hub: BroadcastHub, shutdown: &ShutdownCoordinator) -> JoinHandle<()> {
    let mut guard = shutdown.subscribe_guard();
    tokio::spawn(async move {
        guard.wait().await;
        info!("Closing broadcast hub for shutdown");
        hub.close().await;
    })
}
