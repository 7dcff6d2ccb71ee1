//! Invite link target.

use serde::{Deserialize, Serialize};

use parley_core::types::{RoomId, ServerId};

/// The destination an invite link resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target_id")]
pub enum InviteTarget {
    /// A server (collection of rooms).
    Server(ServerId),
    /// A single room.
    Room(RoomId),
}

impl InviteTarget {
    /// The raw target identifier.
    pub fn target_id(&self) -> &str {
        match self {
            Self::Server(id) => id.as_str(),
            Self::Room(id) => id.as_str(),
        }
    }
}
