use crate::{ConnectionId, ConnectionInfo, ConnectionLimits, Result as WsErrorResult, WsError};

use chat_hub::SubscriptionId;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use error_location::ErrorLocation;
use log::{info, warn};
use tokio::sync::RwLock;

/// Registry for tracking active WebSocket connections
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
}

struct RegistryInner {
    connections: HashMap<ConnectionId, ConnectionInfo>,
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                connections: HashMap::new(),
            })),
            limits,
        }
    }

    /// Register a connection bound to a hub subscription
    pub async fn register(
        &self,
        subscription_id: SubscriptionId,
        resumed_from: Option<u64>,
    ) -> WsErrorResult<ConnectionId> {
        let mut inner = self.inner.write().await;

        if inner.connections.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.connections.len(),
                self.limits.max_total
            );
            return Err(WsError::ConnectionLimitExceeded {
                current: inner.connections.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let connection_id = ConnectionId::new();
        let info = ConnectionInfo {
            connection_id,
            subscription_id,
            resumed_from,
            connected_at: chrono::Utc::now(),
        };

        inner.connections.insert(connection_id, info);
        info!(
            "Registered connection {connection_id} ({} total)",
            inner.connections.len()
        );

        Ok(connection_id)
    }

    /// Returns the removed entry, `None` if it was already gone
    pub async fn unregister(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let mut inner = self.inner.write().await;

        let removed = inner.connections.remove(&connection_id);
        if let Some(info) = &removed {
            let lifetime = chrono::Utc::now() - info.connected_at;
            info!(
                "Unregistered connection {connection_id} after {}s ({} total remaining)",
                lifetime.num_seconds(),
                inner.connections.len()
            );
        }
        removed
    }

    pub async fn get(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let inner = self.inner.read().await;
        inner.connections.get(&connection_id).cloned()
    }

    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    pub fn limits(&self) -> &ConnectionLimits {
        &self.limits
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
        }
    }
}
