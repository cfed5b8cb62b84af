/// Lifecycle of a [`Subscription`](crate::Subscription)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Registered with the hub and receiving live messages
    Active,
    /// Live feed cut; already-queued messages can still be read
    Draining,
    /// Terminal, the stream has ended
    Closed,
}
