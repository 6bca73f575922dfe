//! Delivery endpoints owned by a user: push tokens and bot links.

pub mod bot_link;
pub mod push_token;

pub use bot_link::BotLink;
pub use push_token::PushToken;
