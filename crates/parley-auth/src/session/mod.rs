//! Session lifecycle management.

pub mod controller;
pub mod sweeper;

pub use controller::{RegisterRequest, SessionController};
pub use sweeper::SessionSweeper;
