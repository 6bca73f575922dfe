//! # staylink-entity
//!
//! Domain entity models shared across the StayLink crates. Conversation,
//! message, notification, and device rows are owned by the external stores;
//! the realtime core only mutates them through repository operations.

pub mod conversation;
pub mod device;
pub mod message;
pub mod notification;
pub mod presence;
