mod config;
mod error;
mod hub_config;
mod log_level;
mod logging_config;
mod rate_limit_config;
mod server_config;
mod validation_config;
mod websocket_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use hub_config::HubConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_limit_config::RateLimitConfig;
pub use server_config::ServerConfig;
pub use validation_config::ValidationConfig;
pub use websocket_config::WebSocketConfig;

const CONFIG_DIR_ENV: &str = "CHAT_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".chat";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;
const DEFAULT_MAX_CONNECTIONS: usize = 1000;
const MIN_MAX_CONNECTIONS: usize = 1;
const MAX_MAX_CONNECTIONS: usize = 100_000;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
