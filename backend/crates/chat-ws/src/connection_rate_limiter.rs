use crate::{RateLimitConfig, Result as WsErrorResult, WsError};

use std::num::NonZeroU32;
use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Per-connection rate limiter.
///
/// Token bucket holding `max_messages` tokens, refilled evenly over
/// `window_secs`, so a client may burst up to the full allowance at once.
pub struct ConnectionRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: RateLimitConfig,
}

impl ConnectionRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_messages).unwrap_or(NonZeroU32::MIN);
        let period = Duration::from_secs(config.window_secs.max(1)) / burst.get();
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: RateLimiter::direct(quota),
            config,
        }
    }

    /// Take one token, or fail if the bucket is empty
    #[track_caller]
    pub fn check(&self) -> WsErrorResult<()> {
        self.limiter.check().map_err(|_| WsError::RateLimited {
            limit: self.config.max_messages,
            window_secs: self.config.window_secs,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
