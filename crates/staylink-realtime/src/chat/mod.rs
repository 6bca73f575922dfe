//! Chat orchestration.

pub mod coordinator;

pub use coordinator::{ChatCoordinator, ConversationJoined};
