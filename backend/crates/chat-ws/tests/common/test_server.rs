#![allow(dead_code)]

use chat_hub::{BroadcastHub, HubConfig};
use chat_ws::{
    AppState, ConnectionConfig, ConnectionLimits, ConnectionRegistry, MessageValidator, Metrics,
    RateLimitConfig, RateLimiterFactory, ShutdownCoordinator,
};

use axum::{Router, routing::get};
use axum_test::TestServer;

pub const WS_PATH: &str = "/ws/messages";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections_total: usize,
    pub replay_capacity: usize,
    pub queue_capacity: usize,
    pub max_subscribers: usize,
    pub rate_limit_max_messages: u32,
    pub rate_limit_window_secs: u64,
    pub max_message_length: usize,
    pub heartbeat_interval_secs: u64,
    pub heartbeat_timeout_secs: u64,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections_total: 100,
            replay_capacity: 100,
            queue_capacity: 256,
            max_subscribers: 1000,
            rate_limit_max_messages: 1000,
            rate_limit_window_secs: 60,
            max_message_length: 4096,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 60,
        }
    }
}

impl TestServerConfig {
    pub fn with_replay_capacity(replay_capacity: usize) -> Self {
        Self {
            replay_capacity,
            ..Default::default()
        }
    }

    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_total: 2,
            ..Default::default()
        }
    }

    pub fn with_strict_rate_limits() -> Self {
        Self {
            rate_limit_max_messages: 2,
            rate_limit_window_secs: 60,
            ..Default::default()
        }
    }

    pub fn with_fast_heartbeat() -> Self {
        Self {
            heartbeat_interval_secs: 1,
            heartbeat_timeout_secs: 1,
            ..Default::default()
        }
    }

    pub fn with_max_message_length(max_message_length: usize) -> Self {
        Self {
            max_message_length,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let hub = BroadcastHub::new(HubConfig {
        replay_capacity: config.replay_capacity,
        queue_capacity: config.queue_capacity,
        max_subscribers: config.max_subscribers,
    });

    let app_state = AppState {
        hub,
        registry: ConnectionRegistry::new(ConnectionLimits {
            max_total: config.max_connections_total,
        }),
        rate_limiter_factory: RateLimiterFactory::new(RateLimitConfig {
            max_messages: config.rate_limit_max_messages,
            window_secs: config.rate_limit_window_secs,
        }),
        metrics: Metrics::default(),
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig {
            send_buffer_size: 100,
            heartbeat_interval_secs: config.heartbeat_interval_secs,
            heartbeat_timeout_secs: config.heartbeat_timeout_secs,
        },
        validator: MessageValidator::new(config.max_message_length),
    };

    let router = Router::new()
        .route(WS_PATH, get(chat_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}

/// Poll until the registry holds `expected` connections, or give up after ~2s
pub async fn wait_for_connection_count(app_state: &AppState, expected: usize) -> bool {
    for _ in 0..200 {
        if app_state.registry.total_count().await == expected {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}
