use crate::{MessageId, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as accepted by the hub.
///
/// Serializes to the wire shape `{ "id", "body", "sentAt" }`. The replay
/// `sequence` stays server-side and is not part of the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,

    /// Replay position, starting at 1 and increasing by one per publish
    #[serde(skip)]
    pub sequence: u64,

    pub body: String,

    /// Time the hub accepted the message, not when the client composed it
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(sequence: u64, body: String, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::new(),
            sequence,
            body,
            sent_at,
        }
    }

    /// Encode as a JSON text frame payload
    #[track_caller]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON text frame payload (sequence is left at 0)
    #[track_caller]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
