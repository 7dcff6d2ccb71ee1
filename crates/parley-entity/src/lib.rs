//! # parley-entity
//!
//! Domain entity models for the Parley credential and session engine:
//! credentials, sessions, reset tokens, guest sessions, room access
//! policies, and invite targets.

pub mod credential;
pub mod guest;
pub mod invite;
pub mod reset;
pub mod room;
pub mod session;
pub mod user;

pub use credential::{Credential, KdfAlgorithm};
pub use guest::{GuestScope, GuestSession};
pub use invite::InviteTarget;
pub use reset::PasswordResetToken;
pub use room::RoomAccessPolicy;
pub use session::Session;
pub use user::User;
