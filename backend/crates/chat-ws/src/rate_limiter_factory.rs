use crate::{ConnectionRateLimiter, RateLimitConfig};

/// Builds a fresh limiter for every accepted connection
#[derive(Clone)]
pub struct RateLimiterFactory {
    config: RateLimitConfig,
}

impl RateLimiterFactory {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config }
    }

    pub fn create(&self) -> ConnectionRateLimiter {
        ConnectionRateLimiter::new(self.config.clone())
    }
}

impl Default for RateLimiterFactory {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
