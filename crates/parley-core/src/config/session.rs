//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Guest session lifetime in hours.
    #[serde(default = "default_guest_ttl")]
    pub guest_ttl_hours: u64,
    /// Interval for the expired session sweep in minutes.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl(),
            guest_ttl_hours: default_guest_ttl(),
            sweep_interval_minutes: default_sweep_interval(),
        }
    }
}

fn default_session_ttl() -> u64 {
    72
}

fn default_guest_ttl() -> u64 {
    24
}

fn default_sweep_interval() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize_from_empty_source() {
        let cfg: SessionConfig = serde_json::from_str("{}").expect("defaults");
        assert_eq!(cfg.guest_ttl_hours, 24);
        assert!(cfg.session_ttl_hours > 0);
    }
}
