//! Invite link parsing.

use std::sync::LazyLock;

use regex::Regex;

use parley_core::error::AppError;
use parley_core::result::AppResult;
use parley_core::types::{RoomId, ServerId};
use parley_entity::invite::InviteTarget;

static INVITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(servers|rooms)/([A-Za-z0-9_-]+)$").expect("valid regex"));

/// Resolves an invite link path into its target.
///
/// Accepts exactly `/servers/<id>` or `/rooms/<id>` with ids from
/// `[A-Za-z0-9_-]`; anything else is `InvalidFormat`.
pub fn resolve_invite(link: &str) -> AppResult<InviteTarget> {
    let captures = INVITE_RE
        .captures(link)
        .ok_or_else(|| AppError::invalid_format("Invite link does not match /servers/<id> or /rooms/<id>"))?;

    let id = &captures[2];
    match &captures[1] {
        "servers" => Ok(InviteTarget::Server(ServerId::new(id))),
        _ => Ok(InviteTarget::Room(RoomId::new(id))),
    }
}
