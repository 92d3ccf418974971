use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Paces per-ticker history requests against the market-data host.
///
/// Pure pacing: when budget is exhausted `acquire` sleeps one quota cell and
/// tries again. Retry of failed requests is not this type's concern.
#[derive(Clone)]
pub struct FetchThrottle {
    limiter: Arc<DirectRateLimiter>,
    cell_period: Duration,
}

impl FetchThrottle {
    pub fn new(quota_limit: u32, quota_window: Duration) -> Self {
        let (quota, cell_period) = quota_from_window(quota_window, quota_limit);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            cell_period,
        }
    }

    /// Convenience constructor for the common per-minute quota.
    pub fn per_minute(quota_limit: u32) -> Self {
        Self::new(quota_limit, Duration::from_secs(60))
    }

    /// Waits until one unit of rate budget is available.
    pub async fn acquire(&self) {
        while self.limiter.check().is_err() {
            tokio::time::sleep(self.cell_period).await;
        }
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> (Quota, Duration) {
    let safe_limit = quota_limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit is non-zero");

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    let quota = Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst);
    (quota, period)
}
