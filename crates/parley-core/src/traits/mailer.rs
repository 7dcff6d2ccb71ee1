//! Outbound notification trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for dispatching account notifications.
///
/// Callers treat dispatch as fire-and-forget: a delivery failure is logged
/// and never surfaced to the requester, so the response cannot reveal
/// whether an account exists.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send a password reset email carrying the raw reset token.
    async fn send_password_reset(&self, email: &str, token: &str) -> AppResult<()>;
}
