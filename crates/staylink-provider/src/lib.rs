//! # staylink-provider
//!
//! Thin HTTP clients implementing the [`staylink_core::traits::PushSender`]
//! and [`staylink_core::traits::BotSender`] contracts. Only the send/ack
//! surface of each provider is modeled; retry policy lives outside the
//! messaging core.

pub mod bot;
pub mod push;

pub use bot::BotRelaySender;
pub use push::HttpPushSender;
