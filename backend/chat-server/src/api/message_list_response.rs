use chat_core::Message;

use serde::Serialize;

/// Current replay window.
///
/// `last_sequence` can be passed back as `?since=` when opening the
/// WebSocket to receive only what was published after this response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListResponse {
    pub last_sequence: u64,
    pub capacity: usize,
    pub messages: Vec<Message>,
}
