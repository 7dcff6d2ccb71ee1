//! Shared type definitions.

pub mod id;

pub use id::{RoomId, ServerId, SessionId, UserId};
