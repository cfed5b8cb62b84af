use metrics::{counter, gauge, histogram};

/// Metrics collector for WebSocket connections
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "chat_ws" }
    }

    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Upgrade refused before a socket existed
    pub fn connection_rejected(&self, reason: &str) {
        counter!(format!("{}.connections.rejected.{}", self.prefix, reason)).increment(1);
    }

    /// Chat message accepted from a client and published
    pub fn message_received(&self) {
        counter!(format!("{}.messages.received", self.prefix)).increment(1);
    }

    /// Inbound frame that never reached the hub
    pub fn message_rejected(&self, reason: &str) {
        counter!(format!("{}.messages.rejected.{}", self.prefix, reason)).increment(1);
    }

    pub fn message_sent(&self) {
        counter!(format!("{}.messages.sent", self.prefix)).increment(1);
    }

    /// Time spent inside `publish` for one inbound message
    pub fn publish_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.publish.latency_ms", self.prefix))
            .record(duration.as_secs_f64() * 1000.0);
    }

    pub fn error_occurred(&self, error_type: &str) {
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
