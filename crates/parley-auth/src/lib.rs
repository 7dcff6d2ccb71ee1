//! # parley-auth
//!
//! Credential and session lifecycle engine for the Parley platform.
//!
//! ## Modules
//!
//! - `password` — PBKDF2-SHA256 credential hashing and strength policy
//! - `token` — secure random token generation
//! - `session` — session lifecycle (login, logout, revocation, reset flows)
//! - `access` — invite link resolution, guest joins, room password gates
//! - `store` — the store contract plus a single-node in-memory implementation
//! - `rate` — in-memory rate limiter for the authentication entry points
//! - `mailer` — log-only mailer for single-node deployments

pub mod access;
pub mod mailer;
pub mod password;
pub mod rate;
pub mod session;
pub mod store;
pub mod token;

pub use access::{resolve_invite, AccessResolver, RoomGrant};
pub use password::{PasswordHasher, PasswordPolicy, StrengthReport};
pub use session::{SessionController, SessionSweeper};
pub use store::{AuthStore, MemoryAuthStore};
