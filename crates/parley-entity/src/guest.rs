//! Guest session entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::invite::InviteTarget;

/// Permission set granted to a guest.
///
/// Guests can read and post in their target; administrative actions are
/// not representable here, so a guest grant can never carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestScope {
    /// Whether the guest may read messages.
    pub can_read: bool,
    /// Whether the guest may post messages.
    pub can_post: bool,
}

impl GuestScope {
    /// The restricted scope every guest receives.
    pub fn restricted() -> Self {
        Self {
            can_read: true,
            can_post: true,
        }
    }
}

/// A time-boxed access grant issued through an invite link, without a full
/// user account.
///
/// Never convertible to an account session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestSession {
    /// Opaque guest identifier (hex token).
    pub guest_id: String,
    /// Generated display nick.
    pub nick: String,
    /// The server or room the grant is scoped to.
    pub target: InviteTarget,
    /// When the grant was issued.
    pub issued_at: DateTime<Utc>,
    /// When the grant expires.
    pub expires_at: DateTime<Utc>,
    /// Restricted permission set.
    pub scope: GuestScope,
}

impl GuestSession {
    /// Issue a guest session now with the given lifetime.
    pub fn new(
        guest_id: impl Into<String>,
        nick: impl Into<String>,
        target: InviteTarget,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            guest_id: guest_id.into(),
            nick: nick.into(),
            target,
            issued_at: now,
            expires_at: now + ttl,
            scope: GuestScope::restricted(),
        }
    }

    /// Check whether the grant has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
