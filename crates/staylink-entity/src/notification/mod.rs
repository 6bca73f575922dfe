//! Notification entities.

pub mod channel;
pub mod model;
pub mod setting;

pub use channel::NotificationChannel;
pub use model::{NewNotification, Notification};
pub use setting::NotificationSetting;
