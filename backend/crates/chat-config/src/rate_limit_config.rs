use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Rate limit constraints
pub const MIN_RATE_LIMIT_MESSAGES: u32 = 1;
pub const MAX_RATE_LIMIT_MESSAGES: u32 = 10000;
pub const DEFAULT_RATE_LIMIT_MESSAGES: u32 = 120;

pub const MIN_RATE_LIMIT_WINDOW_SECS: u64 = 1;
pub const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 3600;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Inbound message rate limiting, applied per connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum chat messages per window
    pub max_messages: u32,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_RATE_LIMIT_MESSAGES,
            window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_messages < MIN_RATE_LIMIT_MESSAGES
            || self.max_messages > MAX_RATE_LIMIT_MESSAGES
        {
            return Err(ConfigError::config(format!(
                "rate_limit.max_messages must be {}-{}, got {}",
                MIN_RATE_LIMIT_MESSAGES, MAX_RATE_LIMIT_MESSAGES, self.max_messages
            )));
        }

        if self.window_secs < MIN_RATE_LIMIT_WINDOW_SECS
            || self.window_secs > MAX_RATE_LIMIT_WINDOW_SECS
        {
            return Err(ConfigError::config(format!(
                "rate_limit.window_secs must be {}-{}, got {}",
                MIN_RATE_LIMIT_WINDOW_SECS, MAX_RATE_LIMIT_WINDOW_SECS, self.window_secs
            )));
        }

        Ok(())
    }
}
