//! Notification rendering and dispatch.

pub mod builder;
pub mod dispatcher;

pub use builder::{build, NotificationText};
pub use dispatcher::NotificationDispatcher;
