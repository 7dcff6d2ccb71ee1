//! Integration tests for registration, login, revocation, and reset flows.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use common::{RecordingMailer, TestEngine, TEST_ITERATIONS};
use parley_auth::password::PasswordHasher;
use parley_auth::rate::MemoryRateLimiter;
use parley_auth::session::{RegisterRequest, SessionController};
use parley_auth::store::AuthStore;
use parley_auth::MemoryAuthStore;
use parley_core::config::{AuthConfig, SessionConfig};
use parley_core::error::{AppError, ErrorKind};
use parley_core::result::AppResult;
use parley_core::traits::{BotPolicy, Mailer, RequireChallenge};
use parley_core::types::{SessionId, UserId};

/// Builds a controller directly, for tests that swap a collaborator the
/// shared fixture hardwires.
fn controller_with(
    mailer: Arc<dyn Mailer>,
    bots: Arc<dyn BotPolicy>,
) -> SessionController {
    let auth_config = AuthConfig::default();
    let session_config = SessionConfig::default();
    SessionController::with_hasher(
        Arc::new(MemoryAuthStore::new()),
        mailer,
        Arc::new(MemoryRateLimiter::new(&auth_config)),
        bots,
        &auth_config,
        &session_config,
        PasswordHasher::with_iterations(TEST_ITERATIONS),
    )
}

fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        username: "tester".to_string(),
        password: password.to_string(),
        bot_challenge: None,
    }
}

#[tokio::test]
async fn register_rejects_weak_password() {
    let engine = TestEngine::new();
    let err = engine
        .controller
        .register(register_request("a@example.com", "Weak1"))
        .await
        .expect_err("weak password");
    assert_eq!(err.kind, ErrorKind::WeakPassword);
    assert!(err.message.contains("symbol"));
}

#[tokio::test]
async fn register_rejects_bad_username() {
    let engine = TestEngine::new();
    let err = engine
        .controller
        .register(RegisterRequest {
            username: "x".to_string(),
            ..register_request("a@example.com", "Str0ng!pass")
        })
        .await
        .expect_err("short username");
    assert_eq!(err.kind, ErrorKind::InvalidFormat);
}

#[tokio::test]
async fn register_stores_verifiable_credential() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;

    let user = engine
        .store
        .user_by_email("a@example.com")
        .await
        .expect("stored user");
    assert!(engine.hasher.verify("Str0ng!pass", &user.credential));
    assert!(!engine.hasher.verify("str0ng!pass", &user.credential));
}

#[tokio::test]
async fn register_normalizes_email() {
    let engine = TestEngine::new();
    engine.register(" A@Example.COM ", "Str0ng!pass").await;
    assert!(engine.store.user_by_email("a@example.com").await.is_some());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;
    let err = engine
        .controller
        .register(register_request("a@example.com", "Str0ng!pass"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn login_issues_session() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;

    let session = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect("login");
    assert!(session.expires_at > session.created_at);

    let validated = engine
        .controller
        .validate_session(&session.id)
        .await
        .expect("validate");
    assert_eq!(validated.user_id, session.user_id);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;

    let wrong_password = engine
        .controller
        .login("a@example.com", "bad", None)
        .await
        .expect_err("wrong password");
    let unknown_account = engine
        .controller
        .login("nobody@example.com", "bad", None)
        .await
        .expect_err("unknown account");

    assert_eq!(wrong_password.kind, ErrorKind::InvalidCredentials);
    assert_eq!(unknown_account.kind, ErrorKind::InvalidCredentials);
    assert_eq!(wrong_password.message, unknown_account.message);
}

#[tokio::test]
async fn login_locks_out_after_repeated_failures() {
    let engine = TestEngine::with_max_attempts(3);
    engine.register("a@example.com", "Str0ng!pass").await;

    for _ in 0..3 {
        let _ = engine.controller.login("a@example.com", "bad", None).await;
    }
    let err = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect_err("locked out");
    assert_eq!(err.kind, ErrorKind::RateLimited);
}

#[tokio::test]
async fn multiple_sessions_coexist() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;

    let first = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect("first login");
    let second = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect("second login");
    assert_ne!(first.id, second.id);

    engine.controller.logout(&first.id).await.expect("logout");
    assert!(engine.controller.validate_session(&first.id).await.is_err());
    assert!(engine.controller.validate_session(&second.id).await.is_ok());
}

#[tokio::test]
async fn logout_is_idempotent() {
    let engine = TestEngine::new();
    let id = SessionId::new("never-existed");
    engine.controller.logout(&id).await.expect("first");
    engine.controller.logout(&id).await.expect("second");
}

#[tokio::test]
async fn expired_session_is_treated_as_absent() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;
    let session = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect("login");

    // Rewind expiry directly in the store.
    let mut expired = session.clone();
    expired.expires_at = expired.created_at - Duration::seconds(1);
    engine
        .store
        .create_session(expired)
        .await
        .expect("overwrite");

    let err = engine
        .controller
        .validate_session(&session.id)
        .await
        .expect_err("expired");
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn revoke_requires_ownership() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;
    let session = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect("login");

    let stranger = UserId::new();
    let err = engine
        .controller
        .revoke_session(stranger, &session.id, &SessionId::new("other"))
        .await
        .expect_err("not the owner");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // Target session is intact.
    assert!(engine.controller.validate_session(&session.id).await.is_ok());
}

#[tokio::test]
async fn revoke_unknown_session_is_not_found() {
    let engine = TestEngine::new();
    let err = engine
        .controller
        .revoke_session(
            UserId::new(),
            &SessionId::new("ghost"),
            &SessionId::new("current"),
        )
        .await
        .expect_err("absent");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn revoking_current_session_ends_own_authority() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;
    let session = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect("login");

    engine
        .controller
        .revoke_session(session.user_id, &session.id, &session.id)
        .await
        .expect("self revocation");
    assert!(engine.controller.validate_session(&session.id).await.is_err());
}

#[tokio::test]
async fn reset_request_never_reveals_existence() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;

    engine.request_reset("nobody@example.com").await;
    assert_eq!(engine.mailer.sent_count().await, 0);

    engine.request_reset("a@example.com").await;
    assert_eq!(engine.mailer.sent_count().await, 1);
}

#[tokio::test]
async fn reset_flow_replaces_credential_and_revokes_sessions() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;
    let session = engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .expect("login");

    engine.request_reset("a@example.com").await;
    let token = engine.mailer.last_token().await.expect("token dispatched");

    engine
        .controller
        .confirm_password_reset(&token, "N3w!passw0rd")
        .await
        .expect("confirm");

    // Old password dead, new one works, all sessions revoked.
    assert!(engine
        .controller
        .login("a@example.com", "Str0ng!pass", None)
        .await
        .is_err());
    assert!(engine
        .controller
        .login("a@example.com", "N3w!passw0rd", None)
        .await
        .is_ok());
    assert!(engine.controller.validate_session(&session.id).await.is_err());
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;
    engine.request_reset("a@example.com").await;
    let token = engine.mailer.last_token().await.expect("token");

    engine
        .controller
        .confirm_password_reset(&token, "N3w!passw0rd")
        .await
        .expect("first confirm");
    let err = engine
        .controller
        .confirm_password_reset(&token, "An0ther!pass")
        .await
        .expect_err("second confirm");
    assert_eq!(err.kind, ErrorKind::TokenInvalidOrExpired);
}

#[tokio::test]
async fn weak_replacement_password_does_not_burn_token() {
    let engine = TestEngine::new();
    engine.register("a@example.com", "Str0ng!pass").await;
    engine.request_reset("a@example.com").await;
    let token = engine.mailer.last_token().await.expect("token");

    let err = engine
        .controller
        .confirm_password_reset(&token, "weak")
        .await
        .expect_err("weak");
    assert_eq!(err.kind, ErrorKind::WeakPassword);

    // Token still redeemable afterwards.
    engine
        .controller
        .confirm_password_reset(&token, "N3w!passw0rd")
        .await
        .expect("still valid");
}

#[tokio::test]
async fn reset_requests_do_not_lock_out_login() {
    let engine = TestEngine::with_max_attempts(2);
    engine.register("a@example.com", "Str0ng!pass").await;

    // One mistyped login plus a reset request: failures land in separate
    // buckets, so neither entry point reaches its cap.
    let _ = engine.controller.login("a@example.com", "bad", None).await;
    engine.request_reset("a@example.com").await;
    let token = engine.mailer.last_token().await.expect("token");

    engine
        .controller
        .confirm_password_reset(&token, "N3w!passw0rd")
        .await
        .expect("confirm");

    engine
        .controller
        .login("a@example.com", "N3w!passw0rd", None)
        .await
        .expect("login with the new password");
}

#[tokio::test]
async fn reset_request_survives_mailer_failure() {
    #[derive(Debug, Default)]
    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send_password_reset(&self, _email: &str, _token: &str) -> AppResult<()> {
            Err(AppError::internal("smtp unavailable"))
        }
    }

    let controller = controller_with(
        Arc::new(FailingMailer),
        Arc::new(parley_core::traits::AllowAllBots),
    );
    controller
        .register(register_request("a@example.com", "Str0ng!pass"))
        .await
        .expect("register");

    controller
        .request_password_reset("a@example.com")
        .await
        .expect("mail failure is not surfaced");
    tokio::task::yield_now().await;
}

#[tokio::test]
async fn register_honors_challenge_policy() {
    let controller = controller_with(
        Arc::new(RecordingMailer::default()),
        Arc::new(RequireChallenge),
    );

    let err = controller
        .register(register_request("a@example.com", "Str0ng!pass"))
        .await
        .expect_err("missing challenge");
    assert_eq!(err.kind, ErrorKind::Forbidden);

    controller
        .register(RegisterRequest {
            bot_challenge: Some("solved".to_string()),
            ..register_request("a@example.com", "Str0ng!pass")
        })
        .await
        .expect("challenge supplied");
}

#[tokio::test]
async fn unknown_reset_token_fails() {
    let engine = TestEngine::new();
    let err = engine
        .controller
        .confirm_password_reset("deadbeef", "N3w!passw0rd")
        .await
        .expect_err("unknown token");
    assert_eq!(err.kind, ErrorKind::TokenInvalidOrExpired);
}
