//! Password reset token entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use parley_core::types::UserId;

/// A single-use password reset token.
///
/// `consumed` flips to true atomically on the first successful redemption.
/// Once consumed or past `expires_at` the token is permanently invalid;
/// there is no un-consuming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetToken {
    /// Opaque token value (hex).
    pub token: String,
    /// The account the token resets.
    pub user_id: UserId,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been redeemed.
    pub consumed: bool,
}

impl PasswordResetToken {
    /// Issue a token now with the given lifetime.
    pub fn new(token: impl Into<String>, user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: token.into(),
            user_id,
            issued_at: now,
            expires_at: now + ttl,
            consumed: false,
        }
    }

    /// Whether the token can still be redeemed at `now`.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && self.expires_at > now
    }
}
