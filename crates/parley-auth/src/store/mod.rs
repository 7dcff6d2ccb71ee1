//! Store contract for credential, session, and token persistence.

pub mod memory;

pub use memory::MemoryAuthStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use parley_core::result::AppResult;
use parley_core::types::{RoomId, SessionId, UserId};
use parley_entity::credential::Credential;
use parley_entity::guest::GuestSession;
use parley_entity::reset::PasswordResetToken;
use parley_entity::room::RoomAccessPolicy;
use parley_entity::session::Session;
use parley_entity::user::User;

/// Persistence contract implemented by the external data store.
///
/// The engine is stateless between calls; all cross-request coordination is
/// delegated to the store's atomic update primitives. Implementations must
/// serve lookups at their strongest read-after-write consistency level,
/// since a stale read would let a revoked session or spent token be reused.
#[async_trait]
pub trait AuthStore: Send + Sync + 'static {
    /// Look up the credential owner by normalized email.
    async fn credential_by_email(&self, email: &str)
        -> AppResult<Option<(UserId, Credential)>>;

    /// Create a user record. Duplicate email is a conflict.
    async fn create_user(&self, user: User) -> AppResult<()>;

    /// Replace a user's credential wholesale.
    async fn replace_credential(&self, user_id: UserId, credential: Credential)
        -> AppResult<()>;

    /// Persist a new session.
    async fn create_session(&self, session: Session) -> AppResult<()>;

    /// Look up a session by id.
    async fn session(&self, id: &SessionId) -> AppResult<Option<Session>>;

    /// Delete a session. Deleting an absent session is not an error.
    async fn delete_session(&self, id: &SessionId) -> AppResult<()>;

    /// Delete every session belonging to a user. Returns the count removed.
    async fn delete_sessions_for_user(&self, user_id: UserId) -> AppResult<u32>;

    /// All sessions belonging to a user.
    async fn sessions_for_user(&self, user_id: UserId) -> AppResult<Vec<Session>>;

    /// Advance a session's last-seen timestamp.
    async fn touch_session(&self, id: &SessionId, at: DateTime<Utc>) -> AppResult<()>;

    /// Ids of sessions whose expiry is at or before `now`.
    async fn expired_sessions(&self, now: DateTime<Utc>) -> AppResult<Vec<SessionId>>;

    /// Persist a password reset token.
    async fn create_reset_token(&self, token: PasswordResetToken) -> AppResult<()>;

    /// Atomically consume a reset token.
    ///
    /// Exactly one caller observes the unconsumed token: the consumed flag
    /// flips under the store's atomic compare-and-set, and the owner is
    /// returned to that caller only. Unknown, consumed, or expired tokens
    /// yield `None`.
    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>>;

    /// Look up a room's access policy.
    async fn room_policy(&self, room_id: &RoomId) -> AppResult<Option<RoomAccessPolicy>>;

    /// Persist a guest session.
    async fn create_guest_session(&self, guest: GuestSession) -> AppResult<()>;

    /// Delete guest sessions whose expiry is at or before `now`. Returns
    /// the count removed.
    async fn delete_expired_guests(&self, now: DateTime<Utc>) -> AppResult<u32>;
}
