use crate::subscription::SubscriptionShared;
use crate::{
    CloseReason, HubConfig, HubError, HubMetrics, ReplayBuffer, Result as HubErrorResult,
    Subscription, SubscriptionId,
};

use chat_core::Message;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;

/// Fans published messages out to every live subscription.
///
/// Cloning is cheap and every clone refers to the same hub. `publish`,
/// `subscribe`, `unsubscribe` and `close` serialize on one lock, which makes
/// "take the replay snapshot" and "register the live queue" a single step:
/// a publish lands either in a new subscriber's snapshot or in its queue,
/// never both and never neither. Inside the lock the hub only ever
/// `try_send`s, so a slow consumer can not hold up producers.
pub struct BroadcastHub {
    inner: Arc<RwLock<HubInner>>,
    config: HubConfig,
    metrics: HubMetrics,
}

struct HubInner {
    buffer: ReplayBuffer,
    subscribers: HashMap<SubscriptionId, SubscriberEntry>,
    last_sequence: u64,
    last_sent_at: Option<DateTime<Utc>>,
    closed: bool,
}

/// Hub-side half of a subscription
struct SubscriberEntry {
    sender: mpsc::Sender<Arc<Message>>,
    shared: Arc<SubscriptionShared>,
}

impl HubInner {
    /// Acceptance time, never earlier than the previous one
    fn next_sent_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let sent_at = match self.last_sent_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_sent_at = Some(sent_at);
        sent_at
    }
}

impl BroadcastHub {
    pub fn new(config: HubConfig) -> Self {
        Self::with_metrics(config, HubMetrics::new())
    }

    pub fn with_metrics(config: HubConfig, metrics: HubMetrics) -> Self {
        info!(
            "Creating broadcast hub (replay {}, queue {}, max {} subscribers)",
            config.replay_capacity, config.queue_capacity, config.max_subscribers
        );

        Self {
            inner: Arc::new(RwLock::new(HubInner {
                buffer: ReplayBuffer::new(config.replay_capacity),
                subscribers: HashMap::new(),
                last_sequence: 0,
                last_sent_at: None,
                closed: false,
            })),
            config,
            metrics,
        }
    }

    /// Accept a message and deliver it to every live subscription.
    ///
    /// Assigns the id, replay sequence and acceptance time, appends to the
    /// replay buffer, then enqueues it for each subscriber without waiting.
    /// A subscriber whose queue is full is dropped with
    /// [`CloseReason::Overflow`]; one whose receiver is gone is pruned.
    pub async fn publish(&self, body: impl Into<String>) -> HubErrorResult<Arc<Message>> {
        let body = body.into();
        let mut inner = self.inner.write().await;

        if inner.closed {
            return Err(HubError::Closed {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        inner.last_sequence += 1;
        let sequence = inner.last_sequence;
        let sent_at = inner.next_sent_at();
        let message = Arc::new(Message::new(sequence, body, sent_at));

        if let Some(evicted) = inner.buffer.append(Arc::clone(&message)) {
            debug!("Replay buffer evicted message {}", evicted.sequence);
        }

        let mut delivered = 0;
        let mut overflowed = Vec::new();
        let mut gone = Vec::new();

        for (id, entry) in inner.subscribers.iter() {
            match entry.sender.try_send(Arc::clone(&message)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => overflowed.push(*id),
                Err(TrySendError::Closed(_)) => gone.push(*id),
            }
        }

        for id in overflowed {
            if let Some(entry) = inner.subscribers.remove(&id) {
                entry.shared.mark_closed(CloseReason::Overflow);
                warn!(
                    "Subscription {id} overflowed its queue of {}, dropping it",
                    self.config.queue_capacity
                );
                self.metrics.subscription_closed(CloseReason::Overflow.as_str());
            }
        }

        for id in gone {
            if let Some(entry) = inner.subscribers.remove(&id) {
                entry.shared.mark_closed(CloseReason::Unsubscribed);
                debug!("Pruned closed subscription {id}");
                self.metrics.subscription_closed(CloseReason::Unsubscribed.as_str());
            }
        }

        debug!("Published message {sequence} to {delivered} subscribers");
        self.metrics.message_published(delivered);
        self.metrics.subscriber_count(inner.subscribers.len());

        Ok(message)
    }

    /// Register a new subscription seeded with the current replay snapshot
    pub async fn subscribe(&self) -> HubErrorResult<Subscription> {
        self.register(None).await
    }

    /// Register a subscription that replays only messages after `last_seen`.
    ///
    /// If some of those were already evicted from the replay window,
    /// [`Subscription::missed`] reports how many. A cursor ahead of the latest
    /// publish (kept across a restart) is treated as fresh and gets the full
    /// window.
    pub async fn subscribe_from(&self, last_seen: u64) -> HubErrorResult<Subscription> {
        self.register(Some(last_seen)).await
    }

    async fn register(&self, resume_after: Option<u64>) -> HubErrorResult<Subscription> {
        let mut inner = self.inner.write().await;

        if inner.closed {
            return Err(HubError::Closed {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.prune_released(&mut inner);

        if inner.subscribers.len() >= self.config.max_subscribers {
            warn!(
                "Subscriber limit reached: {}/{}",
                inner.subscribers.len(),
                self.config.max_subscribers
            );
            self.metrics.subscription_rejected();
            return Err(HubError::ResourceExhausted {
                resource: "subscribers",
                limit: self.config.max_subscribers,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (backlog, missed) = match resume_after {
            None => (inner.buffer.snapshot(), 0),
            Some(last_seen) if last_seen > inner.last_sequence => {
                // Cursor from an earlier hub lifetime, sequences have restarted
                warn!(
                    "Resume cursor {last_seen} is ahead of the hub ({}), replaying the full window",
                    inner.last_sequence
                );
                (inner.buffer.snapshot(), 0)
            }
            Some(last_seen) => {
                let backlog = inner.buffer.since(last_seen);
                let requested = inner.last_sequence - last_seen;
                let missed = requested - backlog.len() as u64;
                (backlog, missed)
            }
        };

        let (sender, receiver) = mpsc::channel(self.config.queue_capacity.max(1));
        let shared = Arc::new(SubscriptionShared::default());
        let id = SubscriptionId::new();

        inner.subscribers.insert(
            id,
            SubscriberEntry {
                sender,
                shared: Arc::clone(&shared),
            },
        );

        debug!(
            "Subscription {id} registered with {} replayed messages ({} total subscribers)",
            backlog.len(),
            inner.subscribers.len()
        );
        if missed > 0 {
            warn!("Subscription {id} resumed past the replay window, {missed} messages missed");
            self.metrics.replay_missed(missed);
        }
        self.metrics.subscription_opened();
        self.metrics.subscriber_count(inner.subscribers.len());

        Ok(Subscription::new(id, backlog, receiver, shared, missed))
    }

    /// Drop entries whose `Subscription` was closed or dropped, so they stop
    /// counting against `max_subscribers`
    fn prune_released(&self, inner: &mut HubInner) {
        let before = inner.subscribers.len();
        inner.subscribers.retain(|id, entry| {
            if entry.sender.is_closed() {
                entry.shared.mark_closed(CloseReason::Unsubscribed);
                debug!("Pruned released subscription {id}");
                false
            } else {
                true
            }
        });

        let pruned = before - inner.subscribers.len();
        for _ in 0..pruned {
            self.metrics.subscription_closed(CloseReason::Unsubscribed.as_str());
        }
        if pruned > 0 {
            self.metrics.subscriber_count(inner.subscribers.len());
        }
    }

    /// Remove a subscription from the live set.
    ///
    /// Idempotent: returns `false` when it was already gone (unsubscribed
    /// before, dropped for overflow, or pruned after its receiver closed).
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.write().await;

        match inner.subscribers.remove(&id) {
            Some(entry) => {
                entry.shared.mark_closed(CloseReason::Unsubscribed);
                debug!(
                    "Subscription {id} unsubscribed ({} remaining)",
                    inner.subscribers.len()
                );
                self.metrics.subscription_closed(CloseReason::Unsubscribed.as_str());
                self.metrics.subscriber_count(inner.subscribers.len());
                true
            }
            None => {
                debug!("Subscription {id} already removed");
                false
            }
        }
    }

    /// Close the hub. Every subscription drains what is already queued and
    /// then ends; later publishes and subscribes fail with [`HubError::Closed`].
    pub async fn close(&self) {
        let mut inner = self.inner.write().await;

        if inner.closed {
            return;
        }
        inner.closed = true;

        let count = inner.subscribers.len();
        for (_, entry) in inner.subscribers.drain() {
            entry.shared.mark_closed(CloseReason::HubShutdown);
            self.metrics.subscription_closed(CloseReason::HubShutdown.as_str());
        }
        self.metrics.subscriber_count(0);

        info!("Broadcast hub closed, released {count} subscriptions");
    }

    pub async fn subscriber_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.subscribers.len()
    }

    /// Current replay window, oldest first
    pub async fn snapshot(&self) -> Vec<Arc<Message>> {
        let inner = self.inner.read().await;
        inner.buffer.snapshot()
    }

    /// Replay window together with the sequence of the latest publish, read
    /// under one lock so a client can resume from exactly that point
    pub async fn snapshot_with_sequence(&self) -> (Vec<Arc<Message>>, u64) {
        let inner = self.inner.read().await;
        (inner.buffer.snapshot(), inner.last_sequence)
    }

    /// Sequence of the most recent publish (0 before the first)
    pub async fn last_sequence(&self) -> u64 {
        let inner = self.inner.read().await;
        inner.last_sequence
    }

    pub async fn is_closed(&self) -> bool {
        let inner = self.inner.read().await;
        inner.closed
    }

    /// Replay window size
    pub fn capacity(&self) -> usize {
        self.config.replay_capacity
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl Clone for BroadcastHub {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
