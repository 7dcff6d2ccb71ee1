//! In-memory store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use parley_core::error::AppError;
use parley_core::result::AppResult;
use parley_core::types::{RoomId, SessionId, UserId};
use parley_entity::credential::Credential;
use parley_entity::guest::GuestSession;
use parley_entity::reset::PasswordResetToken;
use parley_entity::room::RoomAccessPolicy;
use parley_entity::session::Session;
use parley_entity::user::User;

use super::AuthStore;

/// Internal state for the memory-based store.
#[derive(Debug, Default)]
struct InnerState {
    /// Users keyed by normalized email.
    users: HashMap<String, User>,
    /// Sessions keyed by session id.
    sessions: HashMap<SessionId, Session>,
    /// Reset tokens keyed by token value.
    reset_tokens: HashMap<String, PasswordResetToken>,
    /// Guest sessions keyed by guest id.
    guests: HashMap<String, GuestSession>,
    /// Room policies keyed by room id.
    rooms: HashMap<RoomId, RoomAccessPolicy>,
}

/// In-memory store using a Tokio mutex for thread safety.
///
/// Suitable for single-node deployments and tests. The single mutex makes
/// every operation atomic with respect to the others; in particular the
/// reset-token consume is a compare-and-set under it.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryAuthStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a room access policy.
    pub async fn insert_room_policy(&self, policy: RoomAccessPolicy) {
        let mut state = self.state.lock().await;
        state.rooms.insert(policy.room_id.clone(), policy);
    }

    /// Look up a user by normalized email. Seeding/inspection helper.
    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        let state = self.state.lock().await;
        state.users.get(email).cloned()
    }

    /// Look up a guest session by id. Inspection helper.
    pub async fn guest_session(&self, guest_id: &str) -> Option<GuestSession> {
        let state = self.state.lock().await;
        state.guests.get(guest_id).cloned()
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn credential_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<(UserId, Credential)>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .get(email)
            .map(|user| (user.id, user.credential.clone())))
    }

    async fn create_user(&self, user: User) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.users.contains_key(&user.email) {
            return Err(AppError::conflict("An account with this email exists"));
        }
        state.users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn replace_credential(
        &self,
        user_id: UserId,
        credential: Credential,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .values_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.credential = credential;
        Ok(())
    }

    async fn create_session(&self, session: Session) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn session(&self, id: &SessionId) -> AppResult<Option<Session>> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(id).cloned())
    }

    async fn delete_session(&self, id: &SessionId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.sessions.remove(id);
        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: UserId) -> AppResult<u32> {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, session| session.user_id != user_id);
        Ok((before - state.sessions.len()) as u32)
    }

    async fn sessions_for_user(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .filter(|session| session.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn touch_session(&self, id: &SessionId, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(session) = state.sessions.get_mut(id) {
            session.last_seen_at = at;
        }
        Ok(())
    }

    async fn expired_sessions(&self, now: DateTime<Utc>) -> AppResult<Vec<SessionId>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .values()
            .filter(|session| session.expires_at <= now)
            .map(|session| session.id.clone())
            .collect())
    }

    async fn create_reset_token(&self, token: PasswordResetToken) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.reset_tokens.insert(token.token.clone(), token);
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UserId>> {
        let mut state = self.state.lock().await;
        match state.reset_tokens.get_mut(token) {
            Some(record) if record.is_redeemable(now) => {
                record.consumed = true;
                Ok(Some(record.user_id))
            }
            _ => Ok(None),
        }
    }

    async fn room_policy(&self, room_id: &RoomId) -> AppResult<Option<RoomAccessPolicy>> {
        let state = self.state.lock().await;
        Ok(state.rooms.get(room_id).cloned())
    }

    async fn create_guest_session(&self, guest: GuestSession) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.guests.insert(guest.guest_id.clone(), guest);
        Ok(())
    }

    async fn delete_expired_guests(&self, now: DateTime<Utc>) -> AppResult<u32> {
        let mut state = self.state.lock().await;
        let before = state.guests.len();
        state.guests.retain(|_, guest| guest.expires_at > now);
        Ok((before - state.guests.len()) as u32)
    }
}
