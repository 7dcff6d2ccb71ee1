//! Session lifecycle controller — registration, login, logout, revocation,
//! and password reset flows.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info, warn};

use parley_core::config::{AuthConfig, SessionConfig};
use parley_core::error::AppError;
use parley_core::result::AppResult;
use parley_core::traits::{BotPolicy, Mailer, RateLimiter};
use parley_core::types::{SessionId, UserId};
use parley_entity::reset::PasswordResetToken;
use parley_entity::session::Session;
use parley_entity::user::User;

use crate::password::{validate_username, PasswordHasher, PasswordPolicy};
use crate::store::AuthStore;
use crate::token;

// Rate-limit keys are namespaced per entry point so reset requests cannot
// push an account toward the login lockout, and vice versa.
fn login_limit_key(email: &str) -> String {
    format!("login:{email}")
}

fn reset_limit_key(email: &str) -> String {
    format!("reset:{email}")
}

/// A registration request.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Display username.
    pub username: String,
    /// Candidate password.
    pub password: String,
    /// Optional bot-mitigation challenge response.
    pub bot_challenge: Option<String>,
}

/// Orchestrates the credential and session lifecycle.
///
/// Stateless between calls; everything it reads or writes lives behind the
/// [`AuthStore`] contract. Key derivation runs inline (CPU-bound by
/// design) and never under a lock.
#[derive(Clone)]
pub struct SessionController {
    /// Credential and session persistence.
    store: Arc<dyn AuthStore>,
    /// Outbound notification dispatch.
    mailer: Arc<dyn Mailer>,
    /// Throttle in front of login and reset requests.
    limiter: Arc<dyn RateLimiter>,
    /// Bot-mitigation hook on registration.
    bots: Arc<dyn BotPolicy>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Password strength policy.
    policy: PasswordPolicy,
    /// Account session lifetime.
    session_ttl: Duration,
    /// Reset token lifetime.
    reset_ttl: Duration,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session_ttl", &self.session_ttl)
            .field("reset_ttl", &self.reset_ttl)
            .finish()
    }
}

impl SessionController {
    /// Creates a controller with all required collaborators.
    pub fn new(
        store: Arc<dyn AuthStore>,
        mailer: Arc<dyn Mailer>,
        limiter: Arc<dyn RateLimiter>,
        bots: Arc<dyn BotPolicy>,
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            limiter,
            bots,
            hasher: PasswordHasher::new(auth_config),
            policy: PasswordPolicy::new(auth_config),
            session_ttl: Duration::hours(session_config.session_ttl_hours as i64),
            reset_ttl: Duration::hours(auth_config.reset_token_ttl_hours as i64),
        }
    }

    /// Creates a controller with an explicit hasher, for tests that need a
    /// reduced iteration count.
    pub fn with_hasher(
        store: Arc<dyn AuthStore>,
        mailer: Arc<dyn Mailer>,
        limiter: Arc<dyn RateLimiter>,
        bots: Arc<dyn BotPolicy>,
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
        hasher: PasswordHasher,
    ) -> Self {
        let mut controller = Self::new(store, mailer, limiter, bots, auth_config, session_config);
        controller.hasher = hasher;
        controller
    }

    /// The hasher this controller derives credentials with.
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Registers a new account.
    ///
    /// Order matters: format and policy gates run before any expensive
    /// derivation, and the bot hook runs before the store is touched.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserId> {
        validate_username(&request.username)?;
        self.bots.verify(request.bot_challenge.as_deref()).await?;
        self.policy.validate(&request.password)?;

        let credential = self.hasher.hash(&request.password)?;
        let user = User {
            id: UserId::new(),
            email: request.email.trim().to_lowercase(),
            username: request.username,
            credential,
            created_at: Utc::now(),
        };
        let user_id = user.id;

        self.store.create_user(user).await?;

        info!(user_id = %user_id, "Account registered");
        Ok(user_id)
    }

    /// Authenticates an account and issues a new session.
    ///
    /// Failure is always `InvalidCredentials`, with a dummy derivation on
    /// unknown emails so response timing does not separate "no such
    /// account" from "wrong password".
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client_meta: Option<serde_json::Value>,
    ) -> AppResult<Session> {
        let email = email.trim().to_lowercase();
        let limit_key = login_limit_key(&email);

        if !self.limiter.check(&limit_key).await {
            return Err(AppError::rate_limited("Too many attempts; try again later"));
        }

        let Some((user_id, credential)) = self.store.credential_by_email(&email).await? else {
            self.hasher.dummy_verify(password);
            self.limiter.record_failure(&limit_key).await;
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify(password, &credential) {
            self.limiter.record_failure(&limit_key).await;
            return Err(AppError::invalid_credentials());
        }
        self.limiter.record_success(&limit_key).await;

        let session = Session::new(
            SessionId::new(token::default_token()?),
            user_id,
            self.session_ttl,
            client_meta,
        );
        self.store.create_session(session.clone()).await?;

        info!(user_id = %user_id, session_id = %session.id, "Login successful");
        Ok(session)
    }

    /// Ends a session. Idempotent: logging out an absent session succeeds.
    pub async fn logout(&self, session_id: &SessionId) -> AppResult<()> {
        self.store.delete_session(session_id).await?;
        info!(session_id = %session_id, "Logout completed");
        Ok(())
    }

    /// Validates that a session exists and has not expired, advancing its
    /// last-seen timestamp.
    ///
    /// An expired session is treated as absent: there is no transition out
    /// of a terminal state.
    pub async fn validate_session(&self, session_id: &SessionId) -> AppResult<Session> {
        let mut session = self
            .store
            .session(session_id)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if session.is_expired() {
            return Err(AppError::invalid_credentials());
        }

        session.touch();
        self.store
            .touch_session(session_id, session.last_seen_at)
            .await?;
        Ok(session)
    }

    /// Revokes one of the requesting user's sessions by id.
    ///
    /// Revoking a session the user does not own fails with `Forbidden` and
    /// leaves the target intact. Revoking the current session ends the
    /// caller's own authority as a side effect of the same deletion.
    pub async fn revoke_session(
        &self,
        requesting_user: UserId,
        target: &SessionId,
        current: &SessionId,
    ) -> AppResult<()> {
        let session = self
            .store
            .session(target)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        if session.is_expired() {
            return Err(AppError::not_found("Session not found"));
        }

        if session.user_id != requesting_user {
            warn!(
                user_id = %requesting_user,
                target = %target,
                "Refused revocation of a session owned by another user"
            );
            return Err(AppError::forbidden("Session belongs to another user"));
        }

        self.store.delete_session(target).await?;

        if target == current {
            info!(user_id = %requesting_user, "Current session revoked by its owner");
        } else {
            info!(user_id = %requesting_user, target = %target, "Session revoked");
        }
        Ok(())
    }

    /// Requests a password reset.
    ///
    /// The outcome never reveals whether the email matches an account: a
    /// token is issued only when it does, and mail dispatch runs on a
    /// detached task so the known-email path returns as fast as the
    /// unknown-email one. Mail failures are logged, not surfaced.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let email = email.trim().to_lowercase();
        let limit_key = reset_limit_key(&email);

        if !self.limiter.check(&limit_key).await {
            return Err(AppError::rate_limited("Too many attempts; try again later"));
        }
        self.limiter.record_failure(&limit_key).await;

        let Some((user_id, _)) = self.store.credential_by_email(&email).await? else {
            return Ok(());
        };

        let value = token::default_token()?;
        let reset = PasswordResetToken::new(value.clone(), user_id, self.reset_ttl);
        self.store.create_reset_token(reset).await?;

        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            if let Err(e) = mailer.send_password_reset(&email, &value).await {
                error!(error = %e, "Failed to dispatch password reset email");
            }
        });

        info!(user_id = %user_id, "Password reset token issued");
        Ok(())
    }

    /// Redeems a reset token and replaces the account credential.
    ///
    /// The strength gate runs first so a weak password does not burn the
    /// token. Consumption is the store's atomic compare-and-set: under
    /// concurrent redemption exactly one caller proceeds. Every existing
    /// session of the account is revoked afterwards.
    pub async fn confirm_password_reset(
        &self,
        token_value: &str,
        new_password: &str,
    ) -> AppResult<()> {
        self.policy.validate(new_password)?;

        let Some(user_id) = self
            .store
            .consume_reset_token(token_value, Utc::now())
            .await?
        else {
            return Err(AppError::token_invalid());
        };

        let credential = self.hasher.hash(new_password)?;
        self.store.replace_credential(user_id, credential).await?;

        let revoked = self.store.delete_sessions_for_user(user_id).await?;
        info!(
            user_id = %user_id,
            sessions_revoked = revoked,
            "Password reset completed"
        );
        Ok(())
    }
}
