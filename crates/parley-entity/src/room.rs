//! Room access policy entity.

use parley_core::types::RoomId;

use crate::credential::Credential;

/// Access policy for a room.
///
/// A password credential is present exactly when the room requires a
/// password; the `Option` encodes that invariant structurally.
#[derive(Debug, Clone)]
pub struct RoomAccessPolicy {
    /// The room this policy governs.
    pub room_id: RoomId,
    /// Credential the supplied password is verified against, when the
    /// room is password-protected.
    pub password: Option<Credential>,
}

impl RoomAccessPolicy {
    /// An open room without a password gate.
    pub fn open(room_id: RoomId) -> Self {
        Self {
            room_id,
            password: None,
        }
    }

    /// A password-protected room.
    pub fn password_protected(room_id: RoomId, credential: Credential) -> Self {
        Self {
            room_id,
            password: Some(credential),
        }
    }

    /// Whether joining requires a password.
    pub fn requires_password(&self) -> bool {
        self.password.is_some()
    }
}
