//! In-process broadcast hub for the chat relay.
//!
//! [`BroadcastHub`] accepts messages from any number of producers, stamps
//! them with an id, a replay sequence and an acceptance time, keeps the most
//! recent ones in a [`ReplayBuffer`], and fans each one out to every live
//! [`Subscription`]. A new subscription first yields the replay snapshot it
//! captured at registration, then every message published afterwards.

pub mod broadcast_hub;
pub mod close_reason;
pub mod error;
pub mod hub_config;
pub mod hub_metrics;
pub mod replay_buffer;
pub mod subscription;
pub mod subscription_id;
pub mod subscription_state;

pub use broadcast_hub::BroadcastHub;
pub use close_reason::CloseReason;
pub use error::{HubError, Result};
pub use hub_config::HubConfig;
pub use hub_metrics::HubMetrics;
pub use replay_buffer::ReplayBuffer;
pub use subscription::Subscription;
pub use subscription_id::SubscriptionId;
pub use subscription_state::SubscriptionState;

#[cfg(test)]
mod tests;
