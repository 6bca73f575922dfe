//! Repository implementations.

pub mod chat;
pub mod notification;
pub mod presence;

pub use chat::ChatRepository;
pub use notification::NotificationRepository;
pub use presence::PresenceRepository;
