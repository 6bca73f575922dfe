//! Logical broadcast rooms.

pub mod broadcaster;
pub mod types;

pub use broadcaster::RoomBroadcaster;
pub use types::Room;
