//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use parley_auth::password::PasswordHasher;
use parley_auth::rate::MemoryRateLimiter;
use parley_auth::{AccessResolver, MemoryAuthStore, SessionController};
use parley_core::config::{AuthConfig, SessionConfig};
use parley_core::result::AppResult;
use parley_core::traits::{AllowAllBots, Mailer};

/// Keeps integration runs fast; production counts come from config.
pub const TEST_ITERATIONS: u32 = 1_000;

/// Mailer that records dispatched reset tokens for inspection.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub async fn last_token(&self) -> Option<String> {
        let sent = self.sent.lock().await;
        sent.last().map(|(_, token)| token.clone())
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> AppResult<()> {
        let mut sent = self.sent.lock().await;
        sent.push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Everything a lifecycle test needs, wired against the in-memory store.
pub struct TestEngine {
    pub store: Arc<MemoryAuthStore>,
    pub mailer: Arc<RecordingMailer>,
    pub controller: SessionController,
    pub resolver: AccessResolver,
    pub hasher: PasswordHasher,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_max_attempts(AuthConfig::default().max_failed_attempts)
    }

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        let auth_config = AuthConfig {
            max_failed_attempts: max_attempts,
            ..AuthConfig::default()
        };
        let session_config = SessionConfig::default();

        let store = Arc::new(MemoryAuthStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let limiter = Arc::new(MemoryRateLimiter::new(&auth_config));
        let hasher = PasswordHasher::with_iterations(TEST_ITERATIONS);

        let controller = SessionController::with_hasher(
            store.clone(),
            mailer.clone(),
            limiter.clone(),
            Arc::new(AllowAllBots),
            &auth_config,
            &session_config,
            hasher.clone(),
        );
        let resolver = AccessResolver::with_hasher(
            store.clone(),
            limiter,
            &session_config,
            hasher.clone(),
        );

        Self {
            store,
            mailer,
            controller,
            resolver,
            hasher,
        }
    }

    /// Requests a reset and yields so the detached mail dispatch task runs
    /// before the caller inspects the mailer.
    pub async fn request_reset(&self, email: &str) {
        self.controller
            .request_password_reset(email)
            .await
            .expect("reset request should succeed");
        tokio::task::yield_now().await;
    }

    pub async fn register(&self, email: &str, password: &str) {
        self.controller
            .register(parley_auth::session::RegisterRequest {
                email: email.to_string(),
                username: "tester".to_string(),
                password: password.to_string(),
                bot_challenge: None,
            })
            .await
            .expect("registration should succeed");
    }
}
