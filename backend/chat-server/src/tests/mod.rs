
use crate::{build_app_state, build_router, hub_config};

use chat_config::Config;
use chat_hub::BroadcastHub;
use chat_ws::{AppState, ShutdownCoordinator};

use axum_test::TestServer;
use metrics_exporter_prometheus::PrometheusHandle;

pub(crate) fn test_state(config: &Config) -> AppState {
    let hub = BroadcastHub::new(hub_config(config));
    build_app_state(config, hub, ShutdownCoordinator::new())
}

pub(crate) fn test_server(state: AppState, metrics: Option<PrometheusHandle>) -> TestServer {
    TestServer::new(build_router(state, metrics)).expect("Failed to create test server")
}
