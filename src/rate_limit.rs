//! Token-bucket rate limiter keyed by client IP address.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Instant;

struct Bucket {
    tokens: f64,
    refilled: Instant,
}

/// In-process token-bucket rate limiter, one bucket per client IP.
///
/// Sized from [`crate::config::Limits`]; the server consults it once per
/// request before routing.
pub struct RateLimiter {
    capacity: u32,
    window_secs: u64,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

impl RateLimiter {
    /// Create a limiter allowing `capacity` requests per `window_secs`.
    pub fn new(capacity: u32, window_secs: u64) -> Self {
        Self {
            capacity,
            window_secs,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Take one token for `ip`.
    ///
    /// Returns the tokens remaining, or [`crate::Error::TooManyRequests`]
    /// carrying the seconds until a token frees up.
    pub fn check(&self, ip: IpAddr) -> crate::Result<u32> {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let rate = self.capacity as f64 / self.window_secs as f64;

        let bucket = buckets.entry(ip).or_insert(Bucket {
            tokens: self.capacity as f64,
            refilled: now,
        });

        let elapsed = now.duration_since(bucket.refilled).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * rate).min(self.capacity as f64);
        bucket.refilled = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(bucket.tokens as u32)
        } else {
            let retry_after = ((1.0 - bucket.tokens) / rate).ceil() as u64;
            Err(crate::Error::TooManyRequests {
                retry_after: retry_after.max(1),
            })
        }
    }

    /// Drop buckets that have been idle long enough to fully refill.
    pub fn cleanup(&self) {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let stale = std::time::Duration::from_secs(self.window_secs * 2);
        buckets.retain(|_, bucket| now.duration_since(bucket.refilled) < stale);
    }
}
