//! Invite link resolution and room/guest access grants.

pub mod invite;
pub mod resolver;

pub use invite::resolve_invite;
pub use resolver::{AccessResolver, RoomGrant};
