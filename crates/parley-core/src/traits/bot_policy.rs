//! Pluggable bot-mitigation policy for the registration path.

use async_trait::async_trait;

use crate::error::AppError;
use crate::result::AppResult;

/// Trait for verifying that a registration attempt comes from a human.
///
/// Implementations wrap an external challenge service (CAPTCHA or similar).
/// The hook sits at the registration boundary so deployments can swap the
/// mechanism without touching lifecycle logic.
#[async_trait]
pub trait BotPolicy: Send + Sync + 'static {
    /// Verify an optional challenge response.
    async fn verify(&self, challenge: Option<&str>) -> AppResult<()>;
}

/// Policy that accepts every registration attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllBots;

#[async_trait]
impl BotPolicy for AllowAllBots {
    async fn verify(&self, _challenge: Option<&str>) -> AppResult<()> {
        Ok(())
    }
}

/// Policy that requires a non-empty challenge response.
///
/// Useful as a stand-in where a real verifier is not yet wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireChallenge;

#[async_trait]
impl BotPolicy for RequireChallenge {
    async fn verify(&self, challenge: Option<&str>) -> AppResult<()> {
        match challenge {
            Some(c) if !c.is_empty() => Ok(()),
            _ => Err(AppError::forbidden("Challenge response required")),
        }
    }
}
