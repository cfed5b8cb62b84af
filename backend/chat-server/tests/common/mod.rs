#![allow(dead_code)]

//! Test infrastructure for chat-server end-to-end tests

use chat_config::Config;
use chat_hub::BroadcastHub;
use chat_server::{build_app_state, build_router, hub_config, spawn_hub_closer};
use chat_ws::{AppState, ShutdownCoordinator};

use axum_test::TestServer;

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// Full router on a real HTTP transport, with the hub closed on shutdown
pub fn create_test_app(config: Config) -> TestApp {
    let hub = BroadcastHub::new(hub_config(&config));
    let shutdown = ShutdownCoordinator::new();
    spawn_hub_closer(hub.clone(), &shutdown);

    let state = build_app_state(&config, hub, shutdown);
    let server = TestServer::builder()
        .http_transport()
        .build(build_router(state.clone(), None))
        .expect("Failed to create test server");

    TestApp { server, state }
}
