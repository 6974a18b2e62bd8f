//! Send pacing between consecutive deliveries.
//!
//! The underlying transport may throttle or drop rapid-fire sends; spacing
//! protects delivery reliability. Pacing is a delay, never a gate: a
//! throttle only waits, it does not reject.

use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

/// Produces one pacing session per dispatch pass. Sessions are independent:
/// concurrent dispatches never share a pacing budget.
pub trait Throttle: Send + Sync {
    fn session(&self) -> Box<dyn ThrottleSession>;
}

/// Pacing state scoped to a single dispatch.
#[async_trait]
pub trait ThrottleSession: Send + Sync {
    /// Blocks until the next send may proceed. The first permit of a
    /// session is granted immediately; each later permit waits out the
    /// configured minimum inter-send interval.
    async fn acquire(&self);
}

/// Paces sends at one per interval, using a direct governor limiter with a
/// burst of one. The bucket starts full, so the first acquire never waits.
pub struct IntervalThrottle {
    interval: Duration,
}

impl IntervalThrottle {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }
}

impl Throttle for IntervalThrottle {
    fn session(&self) -> Box<dyn ThrottleSession> {
        match Quota::with_period(self.interval) {
            Some(quota) => Box::new(PacedSession {
                limiter: RateLimiter::direct(quota),
            }),
            // Zero interval: nothing to pace.
            None => Box::new(UnpacedSession),
        }
    }
}

struct PacedSession {
    limiter: DefaultDirectRateLimiter,
}

#[async_trait]
impl ThrottleSession for PacedSession {
    async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

/// Zero-wait throttle for tests.
pub struct NoopThrottle;

impl Throttle for NoopThrottle {
    fn session(&self) -> Box<dyn ThrottleSession> {
        Box::new(UnpacedSession)
    }
}

struct UnpacedSession;

#[async_trait]
impl ThrottleSession for UnpacedSession {
    async fn acquire(&self) {}
}
