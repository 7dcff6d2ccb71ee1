//! Collaborator traits implemented outside the engine.

pub mod bot_policy;
pub mod mailer;
pub mod rate_limiter;

pub use bot_policy::{AllowAllBots, BotPolicy, RequireChallenge};
pub use mailer::Mailer;
pub use rate_limiter::RateLimiter;
