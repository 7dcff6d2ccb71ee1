//! PBKDF2-SHA256 password hashing and constant-time verification.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use parley_core::config::AuthConfig;
use parley_core::error::{AppError, ErrorKind};
use parley_core::result::AppResult;
use parley_entity::credential::{Credential, KdfAlgorithm, KEY_LEN, SALT_LEN};

/// Handles password hashing and verification using PBKDF2-HMAC-SHA256.
///
/// Derivation is CPU-bound by design (tens of milliseconds); callers must
/// keep it off latency-sensitive paths and never run it under a lock.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Iteration count for new credentials.
    iterations: u32,
}

impl PasswordHasher {
    /// Creates a hasher from auth configuration, with the iteration floor
    /// applied.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            iterations: config.effective_iterations(),
        }
    }

    /// Creates a hasher with an explicit iteration count.
    ///
    /// Intended for tests and migration tooling; production paths construct
    /// from [`AuthConfig`], which enforces the iteration floor.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    /// The iteration count used for new credentials.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hashes a plaintext password with a fresh random salt.
    ///
    /// Fails only if the secure randomness source is unavailable; that
    /// failure is fatal and never falls back to a weak source.
    pub fn hash(&self, password: &str) -> AppResult<Credential> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.try_fill_bytes(&mut salt).map_err(|e| {
            AppError::with_source(ErrorKind::Entropy, "Secure random source unavailable", e)
        })?;
        Ok(self.derive(password, salt, self.iterations))
    }

    /// Verifies a plaintext password against a stored credential.
    ///
    /// Re-derives with the stored salt and iteration count, then compares
    /// in constant time.
    pub fn verify(&self, password: &str, stored: &Credential) -> bool {
        let derived = self.derive(password, stored.salt, stored.iterations);
        constant_time_eq(&derived.key, &stored.key)
    }

    /// Verifies a plaintext password against the persisted
    /// `hex(salt):hex(key)` encoding.
    ///
    /// A malformed encoding verifies as false; it never errors back to the
    /// caller.
    pub fn verify_encoded(&self, password: &str, stored: &str) -> bool {
        match Credential::parse(stored, self.iterations) {
            Ok(credential) => self.verify(password, &credential),
            Err(_) => false,
        }
    }

    /// Runs a derivation against a fixed salt and discards the result.
    ///
    /// Called on lookups that found no account, so the response time does
    /// not reveal whether the account exists.
    pub fn dummy_verify(&self, password: &str) {
        let _ = self.derive(password, [0u8; SALT_LEN], self.iterations);
    }

    fn derive(&self, password: &str, salt: [u8; SALT_LEN], iterations: u32) -> Credential {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut key);
        Credential {
            salt,
            key,
            iterations,
            algorithm: KdfAlgorithm::Pbkdf2Sha256,
        }
    }
}

/// Constant-time byte comparison.
///
/// XOR-accumulates over the full length with no early exit, so timing does
/// not depend on the position of the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low count keeps tests fast; production counts come from config.
    fn hasher() -> PasswordHasher {
        PasswordHasher::with_iterations(1_000)
    }

    #[test]
    fn hash_then_verify_roundtrip() {
        let h = hasher();
        let cred = h.hash("Str0ng!pass").expect("hash");
        assert!(h.verify("Str0ng!pass", &cred));
        assert!(!h.verify("str0ng!pass", &cred));
    }

    #[test]
    fn same_password_hashes_differently() {
        let h = hasher();
        let a = h.hash("Str0ng!pass").expect("hash");
        let b = h.hash("Str0ng!pass").expect("hash");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.encode(), b.encode());
    }

    #[test]
    fn verify_encoded_roundtrip() {
        let h = hasher();
        let cred = h.hash("Str0ng!pass").expect("hash");
        assert!(h.verify_encoded("Str0ng!pass", &cred.encode()));
    }

    #[test]
    fn malformed_encodings_verify_false() {
        let h = hasher();
        assert!(!h.verify_encoded("whatever", "not-a-credential"));
        assert!(!h.verify_encoded("whatever", "aa:bb:cc"));
        assert!(!h.verify_encoded("whatever", "zzzz:0000"));
        assert!(!h.verify_encoded("whatever", ""));
    }

    #[test]
    fn constant_time_eq_full_scan() {
        assert!(constant_time_eq(b"abcdef", b"abcdef"));
        assert!(!constant_time_eq(b"abcdef", b"abcdeg"));
        assert!(!constant_time_eq(b"abcdef", b"bbcdef"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }

    #[test]
    fn stored_iteration_count_wins_on_verify() {
        // A credential derived at one count must verify even if the hasher
        // was constructed with another.
        let old = PasswordHasher::with_iterations(500);
        let cred = old.hash("Str0ng!pass").expect("hash");
        let new = PasswordHasher::with_iterations(2_000);
        assert!(new.verify("Str0ng!pass", &cred));
    }
}
