use metrics::{counter, gauge};

/// Metrics collector for hub operations
#[derive(Clone)]
pub struct HubMetrics {
    prefix: &'static str,
}

impl HubMetrics {
    pub fn new() -> Self {
        Self { prefix: "chat_hub" }
    }

    /// Record an accepted message and how many queues it reached
    pub fn message_published(&self, delivered: usize) {
        counter!(format!("{}.messages.published", self.prefix)).increment(1);
        counter!(format!("{}.messages.delivered", self.prefix)).increment(delivered as u64);
    }

    pub fn subscriber_count(&self, count: usize) {
        gauge!(format!("{}.subscribers.active", self.prefix)).set(count as f64);
    }

    pub fn subscription_opened(&self) {
        counter!(format!("{}.subscriptions.opened", self.prefix)).increment(1);
    }

    pub fn subscription_closed(&self, reason: &str) {
        counter!(format!("{}.subscriptions.closed", self.prefix)).increment(1);
        counter!(format!("{}.subscriptions.closed.{}", self.prefix, reason)).increment(1);
    }

    pub fn subscription_rejected(&self) {
        counter!(format!("{}.subscriptions.rejected", self.prefix)).increment(1);
    }

    /// Record messages a resuming subscriber could not replay
    pub fn replay_missed(&self, missed: u64) {
        counter!(format!("{}.replay.missed", self.prefix)).increment(missed);
    }
}

impl Default for HubMetrics {
    fn default() -> Self {
        Self::new()
    }
}
