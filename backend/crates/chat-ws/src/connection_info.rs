use crate::ConnectionId;

use chat_hub::SubscriptionId;

use chrono::{DateTime, Utc};

/// Information about an active connection
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    /// Hub subscription feeding this connection
    pub subscription_id: SubscriptionId,
    /// Sequence the client resumed after, if it asked to
    pub resumed_from: Option<u64>,
    pub connected_at: DateTime<Utc>,
}
