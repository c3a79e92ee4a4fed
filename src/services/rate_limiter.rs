use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::DataSourceError;
use crate::services::cancel::CancelToken;

/// Token bucket shared by every request a client sends
#[derive(Clone, Debug)]
pub struct RateLimiter {
    inner: Arc<Mutex<Bucket>>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    capacity: f64,
    /// Time to earn one token
    refill_every: Duration,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self, now: Instant) {
        if self.refill_every.is_zero() {
            self.tokens = self.capacity;
        } else {
            let earned = now.duration_since(self.last_refill).as_secs_f64()
                / self.refill_every.as_secs_f64();
            self.tokens = (self.tokens + earned).min(self.capacity);
        }
        self.last_refill = now;
    }
}

impl RateLimiter {
    /// Starts full: the first `capacity` requests go out immediately
    pub fn new(capacity: u32, refill_every: Duration) -> Self {
        let capacity = capacity.max(1) as f64;
        Self {
            inner: Arc::new(Mutex::new(Bucket {
                tokens: capacity,
                capacity,
                refill_every,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Wait for one token; the wait is abandoned on cancellation
    pub async fn acquire(&self, cancel: &CancelToken) -> Result<(), DataSourceError> {
        loop {
            let wait = {
                let mut bucket = self.inner.lock().await;
                bucket.refill(Instant::now());

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return Ok(());
                }

                bucket.refill_every.mul_f64(1.0 - bucket.tokens)
            };

            tracing::trace!("Rate limiter saturated, waiting {:?}", wait);
            cancel.sleep(wait).await?;
        }
    }
}
