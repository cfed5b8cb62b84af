use crate::{Result as WsErrorResult, WsError};

use chat_config::ValidationConfig;

use std::panic::Location;

use error_location::ErrorLocation;

/// Checks inbound chat text before it reaches the hub.
///
/// The hub treats bodies as opaque; these limits belong to the connection
/// layer only.
#[derive(Debug, Clone)]
pub struct MessageValidator {
    max_message_length: usize,
}

impl MessageValidator {
    pub fn new(max_message_length: usize) -> Self {
        Self { max_message_length }
    }

    /// Validate a chat body. Length is measured in bytes.
    #[track_caller]
    pub fn validate_body(&self, body: &str) -> WsErrorResult<()> {
        if body.len() > self.max_message_length {
            return Err(WsError::MessageTooLarge {
                length: body.len(),
                max: self.max_message_length,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if body.trim().is_empty() {
            return Err(WsError::EmptyMessage {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }
}

impl Default for MessageValidator {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

impl From<&ValidationConfig> for MessageValidator {
    fn from(config: &ValidationConfig) -> Self {
        Self::new(config.max_message_length)
    }
}
