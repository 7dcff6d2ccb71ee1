//! # parley-core
//!
//! Core crate for the Parley credential and session engine. Contains the
//! unified error system, configuration schemas, typed identifiers, and the
//! entity-free collaborator traits (mail dispatch, rate limiting, bot
//! mitigation).
//!
//! This crate has **no** internal dependencies on other Parley crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
