//! Log-only mailer for single-node deployments.

use async_trait::async_trait;
use tracing::info;

use parley_core::result::AppResult;
use parley_core::traits::Mailer;

/// Mailer that records dispatch in the log instead of sending.
///
/// The raw token is deliberately not logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> AppResult<()> {
        info!(
            email = %email,
            token_len = token.len(),
            "Password reset email dispatched"
        );
        Ok(())
    }
}
