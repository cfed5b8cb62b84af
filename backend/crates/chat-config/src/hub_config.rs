use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Replay window constraints
pub const MIN_REPLAY_CAPACITY: usize = 0;
pub const MAX_REPLAY_CAPACITY: usize = 100_000;
pub const DEFAULT_REPLAY_CAPACITY: usize = 100;

// Per-subscription queue constraints
pub const MIN_QUEUE_CAPACITY: usize = 1;
pub const MAX_QUEUE_CAPACITY: usize = 100_000;
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

// Subscriber count constraints
pub const MIN_MAX_SUBSCRIBERS: usize = 1;
pub const MAX_MAX_SUBSCRIBERS: usize = 1_000_000;
pub const DEFAULT_MAX_SUBSCRIBERS: usize = 10_000;

/// Broadcast hub settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Recent messages replayed to every new subscriber (0 = live only)
    pub replay_capacity: usize,
    /// Live messages buffered per subscriber before it is dropped as too slow
    pub queue_capacity: usize,
    /// Maximum simultaneous subscriptions
    pub max_subscribers: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_subscribers: DEFAULT_MAX_SUBSCRIBERS,
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.replay_capacity > MAX_REPLAY_CAPACITY {
            return Err(ConfigError::hub(format!(
                "hub.replay_capacity must be {}-{}, got {}",
                MIN_REPLAY_CAPACITY, MAX_REPLAY_CAPACITY, self.replay_capacity
            )));
        }

        if self.queue_capacity < MIN_QUEUE_CAPACITY || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::hub(format!(
                "hub.queue_capacity must be {}-{}, got {}",
                MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.max_subscribers < MIN_MAX_SUBSCRIBERS || self.max_subscribers > MAX_MAX_SUBSCRIBERS
        {
            return Err(ConfigError::hub(format!(
                "hub.max_subscribers must be {}-{}, got {}",
                MIN_MAX_SUBSCRIBERS, MAX_MAX_SUBSCRIBERS, self.max_subscribers
            )));
        }

        Ok(())
    }
}
