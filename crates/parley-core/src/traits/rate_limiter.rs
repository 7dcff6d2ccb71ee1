//! Rate limiter trait guarding the authentication entry points.

use async_trait::async_trait;

/// Trait for throttling repeated authentication attempts.
///
/// Consulted in front of `login`, `join_room`, and
/// `request_password_reset`. Keys are caller-chosen (client address or
/// normalized email).
#[async_trait]
pub trait RateLimiter: Send + Sync + 'static {
    /// Whether the given key is currently allowed to attempt.
    async fn check(&self, key: &str) -> bool;

    /// Record a failed attempt for the key.
    async fn record_failure(&self, key: &str);

    /// Record a successful attempt, clearing the key's failure history.
    async fn record_success(&self, key: &str);
}
