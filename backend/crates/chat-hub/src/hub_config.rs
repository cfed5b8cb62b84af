/// Construction-time settings for a [`BroadcastHub`](crate::BroadcastHub)
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Number of recent messages replayed to new subscribers (0 = live only)
    pub replay_capacity: usize,
    /// Bound of each subscription's live queue; overflowing it drops the subscription
    pub queue_capacity: usize,
    /// Maximum number of simultaneously registered subscriptions
    pub max_subscribers: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            replay_capacity: 100,
            queue_capacity: 256,
            max_subscribers: 10_000,
        }
    }
}
