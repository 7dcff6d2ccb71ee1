//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use parley_core::types::{SessionId, UserId};

/// An active user session.
///
/// Sessions are created on login and destroyed on logout, explicit
/// revocation, or the expiry sweep. A user may hold several sessions at
/// once (multi-device); each is independently revocable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier (hex token).
    pub id: SessionId,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp. The only field mutated in place.
    pub last_seen_at: DateTime<Utc>,
    /// When the session expires. Always strictly after `created_at`.
    pub expires_at: DateTime<Utc>,
    /// Opaque client metadata (device, user agent), if supplied.
    pub client_meta: Option<serde_json::Value>,
}

impl Session {
    /// Create a session starting now with the given time-to-live.
    ///
    /// A non-positive TTL is clamped to one second so that `expires_at`
    /// stays strictly after `created_at`.
    pub fn new(
        id: SessionId,
        user_id: UserId,
        ttl: Duration,
        client_meta: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        let ttl = if ttl <= Duration::zero() {
            Duration::seconds(1)
        } else {
            ttl
        };
        Self {
            id,
            user_id,
            created_at: now,
            last_seen_at: now,
            expires_at: now + ttl,
            client_meta,
        }
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Check whether the session is still active.
    pub fn is_active(&self) -> bool {
        !self.is_expired()
    }

    /// Advance the last-seen timestamp to now.
    pub fn touch(&mut self) {
        self.last_seen_at = Utc::now();
    }
}
