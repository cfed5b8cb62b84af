
use chat_core::Message;

use std::sync::Arc;

use chrono::Utc;

pub(crate) fn message(sequence: u64, body: &str) -> Arc<Message> {
    Arc::new(Message::new(sequence, body.to_string(), Utc::now()))
}

pub(crate) fn bodies(messages: &[Arc<Message>]) -> Vec<String> {
    messages.iter().map(|m| m.body.clone()).collect()
}
