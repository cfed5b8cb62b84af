use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Inbound message size constraints (bytes)
pub const MIN_MESSAGE_LENGTH: usize = 1;
pub const MAX_MESSAGE_LENGTH: usize = 1_048_576;
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4096;

/// Limits enforced on inbound chat messages by the connection layer.
///
/// The hub itself treats message bodies as opaque and never checks them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum body size in bytes
    pub max_message_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_message_length < MIN_MESSAGE_LENGTH
            || self.max_message_length > MAX_MESSAGE_LENGTH
        {
            return Err(ConfigError::config(format!(
                "validation.max_message_length must be {}-{}, got {}",
                MIN_MESSAGE_LENGTH, MAX_MESSAGE_LENGTH, self.max_message_length
            )));
        }

        Ok(())
    }
}
