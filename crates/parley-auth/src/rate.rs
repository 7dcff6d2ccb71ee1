//! In-memory rate limiter for the authentication entry points.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::warn;

use parley_core::config::AuthConfig;
use parley_core::traits::RateLimiter;

/// Entry in the rate limit map.
#[derive(Debug, Clone)]
struct AttemptEntry {
    /// Number of failed attempts.
    failed_attempts: u32,
    /// Time of the last failed attempt.
    last_failure: Instant,
    /// When the lockout expires, if locked out.
    lockout_expiry: Option<Instant>,
}

/// Rate limiter tracking failed attempts per caller key.
///
/// Keys are caller-chosen: normalized email for login and reset requests,
/// client address for room joins.
#[derive(Debug, Clone)]
pub struct MemoryRateLimiter {
    /// Map of keys to attempt entries.
    attempts: Arc<DashMap<String, AttemptEntry>>,
    /// Maximum number of failed attempts before lockout.
    max_attempts: u32,
    /// Duration of the lockout period.
    lockout_duration: Duration,
}

impl MemoryRateLimiter {
    /// Creates a limiter from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts: config.max_failed_attempts,
            lockout_duration: Duration::from_secs(config.lockout_duration_minutes * 60),
        }
    }

    /// Creates a limiter with explicit parameters.
    pub fn with_limits(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
        }
    }

    /// Drops entries whose lockout has expired and stale failure history.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.attempts.retain(|_, entry| {
            if let Some(expiry) = entry.lockout_expiry {
                return now < expiry;
            }
            now.duration_since(entry.last_failure) < Duration::from_secs(24 * 60 * 60)
        });
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(&self, key: &str) -> bool {
        if let Some(entry) = self.attempts.get(key) {
            if let Some(expiry) = entry.lockout_expiry {
                if Instant::now() < expiry {
                    return false;
                }
            }
        }
        true
    }

    async fn record_failure(&self, key: &str) {
        let now = Instant::now();
        let mut entry = self
            .attempts
            .entry(key.to_string())
            .or_insert_with(|| AttemptEntry {
                failed_attempts: 0,
                last_failure: now,
                lockout_expiry: None,
            });

        // Expired lockouts reset the counter before the new failure counts.
        if let Some(expiry) = entry.lockout_expiry {
            if now >= expiry {
                entry.failed_attempts = 0;
                entry.lockout_expiry = None;
            }
        }

        entry.failed_attempts += 1;
        entry.last_failure = now;

        if entry.failed_attempts >= self.max_attempts {
            entry.lockout_expiry = Some(now + self.lockout_duration);
            warn!(key = %key, attempts = entry.failed_attempts, "Rate limit lockout");
        }
    }

    async fn record_success(&self, key: &str) {
        self.attempts.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32) -> MemoryRateLimiter {
        MemoryRateLimiter::with_limits(max, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn locks_out_after_max_failures() {
        let rl = limiter(3);
        assert!(rl.check("k").await);
        for _ in 0..3 {
            rl.record_failure("k").await;
        }
        assert!(!rl.check("k").await);
    }

    #[tokio::test]
    async fn success_clears_history() {
        let rl = limiter(3);
        rl.record_failure("k").await;
        rl.record_failure("k").await;
        rl.record_success("k").await;
        for _ in 0..2 {
            rl.record_failure("k").await;
        }
        assert!(rl.check("k").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let rl = limiter(1);
        rl.record_failure("a").await;
        assert!(!rl.check("a").await);
        assert!(rl.check("b").await);
    }
}
