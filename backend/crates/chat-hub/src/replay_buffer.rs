use chat_core::Message;

use std::collections::VecDeque;
use std::sync::Arc;

/// Bounded FIFO history of the most recently published messages.
///
/// Holds at most `capacity` messages in publish order and evicts the oldest
/// on overflow. Not synchronized on its own: the hub mutates it only while
/// holding its registry lock, so a snapshot never sees a half-applied append.
#[derive(Debug)]
pub struct ReplayBuffer {
    entries: VecDeque<Arc<Message>>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append at the tail, evicting the head first when full.
    ///
    /// Returns the message that is no longer retained, if any. With a
    /// capacity of zero that is the appended message itself.
    pub fn append(&mut self, message: Arc<Message>) -> Option<Arc<Message>> {
        if self.capacity == 0 {
            return Some(message);
        }

        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };

        self.entries.push_back(message);
        evicted
    }

    /// Ordered copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<Arc<Message>> {
        self.entries.iter().cloned().collect()
    }

    /// Retained messages whose sequence is strictly greater than `sequence`
    pub fn since(&self, sequence: u64) -> Vec<Arc<Message>> {
        let start = self.entries.partition_point(|m| m.sequence <= sequence);
        self.entries.range(start..).cloned().collect()
    }

    pub fn oldest_sequence(&self) -> Option<u64> {
        self.entries.front().map(|m| m.sequence)
    }

    pub fn newest_sequence(&self) -> Option<u64> {
        self.entries.back().map(|m| m.sequence)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
