//! Authentication and credential configuration.

use serde::{Deserialize, Serialize};

/// Hard floor for the PBKDF2 iteration count. Configuration may raise the
/// count but never lower it below this value.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// PBKDF2-HMAC-SHA256 iteration count. Values below the floor are
    /// clamped up to [`MIN_PBKDF2_ITERATIONS`].
    #[serde(default = "default_iterations")]
    pub pbkdf2_iterations: u32,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Password reset token lifetime in hours.
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_hours: u64,
    /// Maximum failed attempts per key before the rate limiter locks out.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Rate limiter lockout duration in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
}

impl AuthConfig {
    /// Effective PBKDF2 iteration count with the floor applied.
    pub fn effective_iterations(&self) -> u32 {
        self.pbkdf2_iterations.max(MIN_PBKDF2_ITERATIONS)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: default_iterations(),
            password_min_length: default_password_min(),
            reset_token_ttl_hours: default_reset_ttl(),
            max_failed_attempts: default_max_failed(),
            lockout_duration_minutes: default_lockout(),
        }
    }
}

fn default_iterations() -> u32 {
    120_000
}

fn default_password_min() -> usize {
    8
}

fn default_reset_ttl() -> u64 {
    24
}

fn default_max_failed() -> u32 {
    5
}

fn default_lockout() -> u64 {
    5
}
