use chat_config::Config;
use chat_hub::BroadcastHub;
use chat_server::{build_app_state, build_router, hub_config, logger, prometheus, spawn_hub_closer};
use chat_ws::ShutdownCoordinator;

use std::error::Error;

use log::{error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional, real environment variables win
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e.into());
    }

    let config = Config::load()?;
    config.validate()?;

    let log_file_path = config.log_file_path()?;
    if let Some(dir) = log_file_path.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(dir)?;
    }

    // Before anything else logs
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting chat-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let prometheus_handle = prometheus::install_recorder()?;

    let hub = BroadcastHub::new(hub_config(&config));
    let shutdown = ShutdownCoordinator::new();
    let hub_closer = spawn_hub_closer(hub.clone(), &shutdown);

    let app_state = build_app_state(&config, hub, shutdown.clone());
    let app = build_router(app_state, Some(prometheus_handle));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    // Port 0 is resolved by the OS
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("No longer accepting connections");
        })
        .await?;

    if let Err(e) = hub_closer.await {
        warn!("Hub close task failed: {}", e);
    }

    info!("Graceful shutdown complete");
    Ok(())
}
