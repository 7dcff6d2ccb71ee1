//! User account entity.

use chrono::{DateTime, Utc};

use parley_core::types::UserId;

use crate::credential::Credential;

/// A registered user account.
///
/// Carries the stored credential, so it has no serde derives; transport
/// representations are built at the boundary without the credential.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique account identifier.
    pub id: UserId,
    /// Login email, stored lowercase.
    pub email: String,
    /// Display username, `[A-Za-z0-9_-]{3,20}`.
    pub username: String,
    /// Stored password credential.
    pub credential: Credential,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
