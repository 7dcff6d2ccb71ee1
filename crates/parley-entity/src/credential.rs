//! Stored password credential.
//!
//! A credential is a salt plus a PBKDF2-derived key, persisted as
//! `hex(salt):hex(key)`. This encoding is a stored-state contract: existing
//! rows in the hosted backend use it, so it must not change shape.

use std::fmt;

use parley_core::error::{AppError, ErrorKind};
use parley_core::result::AppResult;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

/// Key derivation algorithm used for a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfAlgorithm {
    /// PBKDF2 with HMAC-SHA256.
    Pbkdf2Sha256,
}

/// A stored password credential.
///
/// Immutable once created; a password change replaces the credential
/// wholesale. Holds key material, so it carries no serde derives and its
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Per-credential random salt. Never reused across hash operations.
    pub salt: [u8; SALT_LEN],
    /// PBKDF2-derived key.
    pub key: [u8; KEY_LEN],
    /// Iteration count the key was derived with.
    pub iterations: u32,
    /// Derivation algorithm.
    pub algorithm: KdfAlgorithm,
}

impl Credential {
    /// Encode as the persisted `hex(salt):hex(key)` form.
    pub fn encode(&self) -> String {
        format!("{}:{}", hex::encode(self.salt), hex::encode(self.key))
    }

    /// Parse the persisted `hex(salt):hex(key)` form.
    ///
    /// The iteration count is not part of the stored encoding; the caller
    /// supplies the count the deployment derives with.
    pub fn parse(encoded: &str, iterations: u32) -> AppResult<Self> {
        let mut parts = encoded.split(':');
        let (salt_hex, key_hex) = match (parts.next(), parts.next(), parts.next()) {
            (Some(s), Some(k), None) => (s, k),
            _ => {
                return Err(AppError::invalid_format(
                    "Credential must have exactly two colon-separated parts",
                ))
            }
        };

        let salt_bytes = hex::decode(salt_hex).map_err(|e| {
            AppError::with_source(ErrorKind::InvalidFormat, "Credential salt is not valid hex", e)
        })?;
        let key_bytes = hex::decode(key_hex).map_err(|e| {
            AppError::with_source(ErrorKind::InvalidFormat, "Credential key is not valid hex", e)
        })?;

        let salt: [u8; SALT_LEN] = salt_bytes
            .try_into()
            .map_err(|_| AppError::invalid_format("Credential salt must be 16 bytes"))?;
        let key: [u8; KEY_LEN] = key_bytes
            .try_into()
            .map_err(|_| AppError::invalid_format("Credential key must be 32 bytes"))?;

        Ok(Self {
            salt,
            key,
            iterations,
            algorithm: KdfAlgorithm::Pbkdf2Sha256,
        })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("algorithm", &self.algorithm)
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Credential {
        Credential {
            salt: [7u8; SALT_LEN],
            key: [9u8; KEY_LEN],
            iterations: 120_000,
            algorithm: KdfAlgorithm::Pbkdf2Sha256,
        }
    }

    #[test]
    fn encode_parse_preserves_wire_format() {
        let cred = sample();
        let encoded = cred.encode();
        let (salt_hex, key_hex) = encoded.split_once(':').expect("colon separator");
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert_eq!(key_hex.len(), KEY_LEN * 2);

        let parsed = Credential::parse(&encoded, 120_000).expect("parse");
        assert_eq!(parsed, cred);
    }

    #[test]
    fn parse_rejects_wrong_part_count() {
        assert!(Credential::parse("deadbeef", 120_000).is_err());
        assert!(Credential::parse("aa:bb:cc", 120_000).is_err());
    }

    #[test]
    fn parse_rejects_bad_hex() {
        let bad = format!("{}:{}", "zz".repeat(SALT_LEN), "00".repeat(KEY_LEN));
        assert!(Credential::parse(&bad, 120_000).is_err());
    }

    #[test]
    fn parse_rejects_wrong_lengths() {
        let short = format!("{}:{}", "00".repeat(8), "00".repeat(KEY_LEN));
        assert!(Credential::parse(&short, 120_000).is_err());
    }

    #[test]
    fn debug_output_redacts_key_material() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("salt"));
        assert!(!rendered.contains("key"));
    }
}
