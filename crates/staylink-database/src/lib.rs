//! # staylink-database
//!
//! PostgreSQL access for StayLink: connection pool management, the store
//! contracts consumed by the realtime core, and their sqlx-backed
//! repository implementations.

pub mod connection;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ChatStore, NotificationStore, PresenceStore};
