use chat_core::CoreError;
use chat_hub::HubError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// WebSocket close code: normal closure
pub const CLOSE_NORMAL: u16 = 1000;
/// WebSocket close code: server going away (shutdown)
pub const CLOSE_GOING_AWAY: u16 = 1001;
/// WebSocket close code: unsupported data
pub const CLOSE_UNSUPPORTED: u16 = 1003;
/// WebSocket close code: policy violation
pub const CLOSE_POLICY: u16 = 1008;
/// WebSocket close code: message too big
pub const CLOSE_TOO_BIG: u16 = 1009;
/// WebSocket close code: internal server error
pub const CLOSE_INTERNAL: u16 = 1011;
/// WebSocket close code: try again later
pub const CLOSE_TRY_AGAIN: u16 = 1013;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Send buffer closed, socket writer gone {location}")]
    SendBufferClosed { location: ErrorLocation },

    #[error("Subscription dropped, client too slow {location}")]
    SubscriptionOverflow { location: ErrorLocation },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Message rejected: body is empty {location}")]
    EmptyMessage { location: ErrorLocation },

    #[error("Message too large: {length} bytes (max: {max}) {location}")]
    MessageTooLarge {
        length: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Unsupported frame: {kind} {location}")]
    UnsupportedFrame {
        kind: &'static str,
        location: ErrorLocation,
    },

    #[error("Rate limit exceeded: {limit} messages per {window_secs}s {location}")]
    RateLimited {
        limit: u32,
        window_secs: u64,
        location: ErrorLocation,
    },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Hub error: {source} {location}")]
    Hub {
        #[source]
        source: HubError,
        location: ErrorLocation,
    },

    #[error("Encode error: {source} {location}")]
    Encode {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },
}

impl WsError {
    /// Close code sent to the client when this error ends the connection
    pub fn close_code(&self) -> u16 {
        match self {
            Self::ConnectionClosed { .. } => CLOSE_NORMAL,
            Self::SendBufferClosed { .. } => CLOSE_INTERNAL,
            Self::SubscriptionOverflow { .. } => CLOSE_TRY_AGAIN,
            Self::ConnectionLimitExceeded { .. } => CLOSE_TRY_AGAIN,
            Self::EmptyMessage { .. } => CLOSE_POLICY,
            Self::MessageTooLarge { .. } => CLOSE_TOO_BIG,
            Self::UnsupportedFrame { .. } => CLOSE_UNSUPPORTED,
            Self::RateLimited { .. } => CLOSE_POLICY,
            Self::HeartbeatTimeout { .. } => CLOSE_GOING_AWAY,
            Self::Hub { .. } => CLOSE_INTERNAL,
            Self::Encode { .. } => CLOSE_INTERNAL,
        }
    }

    /// Short machine-readable reason, used as the close frame text and metric label
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "connection_closed",
            Self::SendBufferClosed { .. } => "send_buffer_closed",
            Self::SubscriptionOverflow { .. } => "slow_consumer",
            Self::ConnectionLimitExceeded { .. } => "connection_limit",
            Self::EmptyMessage { .. } => "empty_message",
            Self::MessageTooLarge { .. } => "message_too_large",
            Self::UnsupportedFrame { .. } => "unsupported_frame",
            Self::RateLimited { .. } => "rate_limited",
            Self::HeartbeatTimeout { .. } => "heartbeat_timeout",
            Self::Hub { .. } => "hub_error",
            Self::Encode { .. } => "encode_error",
        }
    }
}

impl From<HubError> for WsError {
    #[track_caller]
    fn from(source: HubError) -> Self {
        Self::Hub {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for WsError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        Self::Encode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
