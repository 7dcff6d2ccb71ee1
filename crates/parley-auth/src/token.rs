//! Secure random token generation.
//!
//! Session ids, reset tokens, and guest ids all come from here. The only
//! failure mode is an unavailable entropy source, which is fatal; there is
//! no fallback to a weak source.

use rand::rngs::OsRng;
use rand::RngCore;

use parley_core::error::{AppError, ErrorKind};
use parley_core::result::AppResult;

/// Default token length in bytes before hex encoding (16 bytes = 32 hex
/// characters).
pub const DEFAULT_TOKEN_BYTES: usize = 16;

/// Draws `byte_length` bytes from the OS random source, hex-encoded.
pub fn random_token(byte_length: usize) -> AppResult<String> {
    let mut bytes = vec![0u8; byte_length];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        AppError::with_source(ErrorKind::Entropy, "Secure random source unavailable", e)
    })?;
    Ok(hex::encode(bytes))
}

/// Draws a token of the default length.
pub fn default_token() -> AppResult<String> {
    random_token(DEFAULT_TOKEN_BYTES)
}
