//! Token gates for privileged outbound operations.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

/// Bucket guarding identify handshakes.
pub const IDENTIFY_BUCKET: &str = "identify";

#[derive(Debug, Clone, Copy)]
struct Bucket {
    limit: u32,
    window: Duration,
    remaining: u32,
    window_started: Instant,
}

/// Fixed-window token gate, one bucket per named operation.
///
/// Exhaustion never blocks: [`RateLimiter::try_acquire`] hands the
/// refill delay back to the caller, who decides to wait or abort.
pub struct RateLimiter {
    buckets: DashMap<String, Bucket>,
}

impl RateLimiter {
    /// Create a limiter with no configured buckets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Configure a bucket. Replaces any existing bucket of that name
    /// with a full window.
    pub fn configure(&self, name: impl Into<String>, limit: u32, window: Duration) {
        let name = name.into();
        debug!(bucket = %name, limit, window = ?window, "configuring token gate");
        self.buckets.insert(
            name,
            Bucket {
                limit,
                window,
                remaining: limit,
                window_started: Instant::now(),
            },
        );
    }

    /// Take one token from a bucket.
    ///
    /// Unconfigured buckets never gate.
    ///
    /// # Errors
    ///
    /// On exhaustion, returns how long until the bucket refills.
    pub fn try_acquire(&self, name: &str) -> Result<(), Duration> {
        let Some(mut bucket) = self.buckets.get_mut(name) else {
            return Ok(());
        };

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.window_started);
        if elapsed >= bucket.window {
            bucket.remaining = bucket.limit;
            bucket.window_started = now;
        }

        if bucket.remaining == 0 {
            let elapsed = now.duration_since(bucket.window_started);
            return Err(bucket.window.saturating_sub(elapsed));
        }

        bucket.remaining -= 1;
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_bucket_never_gates() {
        let limiter = RateLimiter::new();
        for _ in 0..100 {
            assert!(limiter.try_acquire("anything").is_ok());
        }
    }

    #[test]
    fn test_exhaustion_returns_retry_after() {
        let limiter = RateLimiter::new();
        limiter.configure(IDENTIFY_BUCKET, 2, Duration::from_secs(60));

        assert!(limiter.try_acquire(IDENTIFY_BUCKET).is_ok());
        assert!(limiter.try_acquire(IDENTIFY_BUCKET).is_ok());

        let retry_after = limiter.try_acquire(IDENTIFY_BUCKET).unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
        assert!(retry_after > Duration::from_secs(50));
    }

    #[test]
    fn test_window_refills() {
        let limiter = RateLimiter::new();
        limiter.configure("gate", 1, Duration::from_millis(30));

        assert!(limiter.try_acquire("gate").is_ok());
        assert!(limiter.try_acquire("gate").is_err());

        std::thread::sleep(Duration::from_millis(40));
        assert!(limiter.try_acquire("gate").is_ok());
    }

    #[test]
    fn test_zero_limit_always_gates() {
        let limiter = RateLimiter::new();
        limiter.configure("never", 0, Duration::from_secs(5));
        assert!(limiter.try_acquire("never").is_err());
    }
}
