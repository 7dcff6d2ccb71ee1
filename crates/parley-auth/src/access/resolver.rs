//! Access resolver — guest joins and room password gates.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use parley_core::config::{AuthConfig, SessionConfig};
use parley_core::error::AppError;
use parley_core::result::AppResult;
use parley_core::traits::RateLimiter;
use parley_core::types::{RoomId, SessionId};
use parley_entity::guest::GuestSession;
use parley_entity::invite::InviteTarget;
use parley_entity::session::Session;

use crate::password::PasswordHasher;
use crate::store::AuthStore;
use crate::token;

use super::invite::resolve_invite;

/// A grant to join a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomGrant {
    /// Grant referencing an authenticated caller's existing session.
    Member {
        /// The room being joined.
        room_id: RoomId,
        /// The caller's session.
        session_id: SessionId,
    },
    /// Time-boxed, permission-restricted guest grant.
    Guest(GuestSession),
}

/// Resolves invite links and room joins into access grants.
#[derive(Clone)]
pub struct AccessResolver {
    /// Policy and guest persistence.
    store: Arc<dyn AuthStore>,
    /// Throttle in front of password-gated joins.
    limiter: Arc<dyn RateLimiter>,
    /// Verifier for room passwords. Shares the constant-time path used for
    /// account credentials.
    hasher: PasswordHasher,
    /// Guest grant lifetime.
    guest_ttl: Duration,
}

impl std::fmt::Debug for AccessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessResolver")
            .field("guest_ttl", &self.guest_ttl)
            .finish()
    }
}

impl AccessResolver {
    /// Creates a resolver with all required collaborators.
    pub fn new(
        store: Arc<dyn AuthStore>,
        limiter: Arc<dyn RateLimiter>,
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            store,
            limiter,
            hasher: PasswordHasher::new(auth_config),
            guest_ttl: Duration::hours(session_config.guest_ttl_hours as i64),
        }
    }

    /// Creates a resolver with an explicit hasher, for tests that need a
    /// reduced iteration count.
    pub fn with_hasher(
        store: Arc<dyn AuthStore>,
        limiter: Arc<dyn RateLimiter>,
        session_config: &SessionConfig,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            store,
            limiter,
            hasher,
            guest_ttl: Duration::hours(session_config.guest_ttl_hours as i64),
        }
    }

    /// Joins through an invite link as a guest.
    ///
    /// Issues a persisted, time-boxed guest session scoped to the link's
    /// target. Guest sessions are never convertible to account sessions.
    pub async fn join_guest(&self, link: &str) -> AppResult<GuestSession> {
        let target = resolve_invite(link)?;

        let guest_id = token::default_token()?;
        let nick = format!("guest-{}", token::random_token(2)?);
        let guest = GuestSession::new(guest_id, nick, target, self.guest_ttl);

        self.store.create_guest_session(guest.clone()).await?;

        info!(
            guest_id = %guest.guest_id,
            target = %guest.target.target_id(),
            "Guest session issued"
        );
        Ok(guest)
    }

    /// Joins a room, passing its password gate if one is set.
    ///
    /// `client_key` identifies the caller for rate limiting. A wrong or
    /// missing password on a protected room yields `InvalidPassword` and no
    /// grant; the dummy derivation on the missing-password path keeps
    /// timing uniform.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        password: Option<&str>,
        session: Option<&Session>,
        client_key: &str,
    ) -> AppResult<RoomGrant> {
        if !self.limiter.check(client_key).await {
            return Err(AppError::rate_limited("Too many attempts; try again later"));
        }

        let policy = self
            .store
            .room_policy(room_id)
            .await?
            .ok_or_else(|| AppError::not_found("Room not found"))?;

        if let Some(credential) = &policy.password {
            let ok = match password {
                Some(p) => self.hasher.verify(p, credential),
                None => {
                    self.hasher.dummy_verify("");
                    false
                }
            };
            if !ok {
                self.limiter.record_failure(client_key).await;
                return Err(AppError::invalid_password());
            }
            self.limiter.record_success(client_key).await;
        }

        match session {
            Some(s) => {
                if s.is_expired() {
                    return Err(AppError::invalid_credentials());
                }
                info!(room_id = %room_id, session_id = %s.id, "Room join granted");
                Ok(RoomGrant::Member {
                    room_id: room_id.clone(),
                    session_id: s.id.clone(),
                })
            }
            None => {
                let guest_id = token::default_token()?;
                let nick = format!("guest-{}", token::random_token(2)?);
                let guest = GuestSession::new(
                    guest_id,
                    nick,
                    InviteTarget::Room(room_id.clone()),
                    self.guest_ttl,
                );
                self.store.create_guest_session(guest.clone()).await?;
                info!(room_id = %room_id, guest_id = %guest.guest_id, "Guest room join granted");
                Ok(RoomGrant::Guest(guest))
            }
        }
    }
}
