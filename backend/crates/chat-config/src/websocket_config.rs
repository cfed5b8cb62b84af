use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Outbound frame buffer (per connection)
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 100;

// Ping interval (seconds)
pub const MIN_HEARTBEAT_INTERVAL_SECS: u64 = 5;
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

// Idle timeout (seconds)
pub const MIN_HEARTBEAT_TIMEOUT_SECS: u64 = 10;
pub const MAX_HEARTBEAT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 60;

/// Per-connection WebSocket settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Frames queued for the socket writer before the connection backs up
    pub send_buffer_size: usize,
    /// Seconds between server pings
    pub heartbeat_interval_secs: u64,
    /// Seconds without any inbound frame before the connection is closed
    pub heartbeat_timeout_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
        }
    }
}

impl WebSocketConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        Self::check_range(
            "send_buffer_size",
            self.send_buffer_size as u64,
            MIN_SEND_BUFFER_SIZE as u64,
            MAX_SEND_BUFFER_SIZE as u64,
        )?;
        Self::check_range(
            "heartbeat_interval_secs",
            self.heartbeat_interval_secs,
            MIN_HEARTBEAT_INTERVAL_SECS,
            MAX_HEARTBEAT_INTERVAL_SECS,
        )?;
        Self::check_range(
            "heartbeat_timeout_secs",
            self.heartbeat_timeout_secs,
            MIN_HEARTBEAT_TIMEOUT_SECS,
            MAX_HEARTBEAT_TIMEOUT_SECS,
        )?;

        // A timeout at or below the ping interval would close healthy clients.
        if self.heartbeat_timeout_secs <= self.heartbeat_interval_secs {
            return Err(ConfigError::config(format!(
                "websocket.heartbeat_timeout_secs ({}) must be greater than heartbeat_interval_secs ({})",
                self.heartbeat_timeout_secs, self.heartbeat_interval_secs
            )));
        }

        Ok(())
    }

    #[track_caller]
    fn check_range(field: &str, value: u64, min: u64, max: u64) -> ConfigErrorResult<()> {
        if value < min || value > max {
            return Err(ConfigError::config(format!(
                "websocket.{field} must be {min}-{max}, got {value}"
            )));
        }
        Ok(())
    }
}
