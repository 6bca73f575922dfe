//! Notification dispatch configuration.

use serde::{Deserialize, Serialize};

/// Notification dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Capacity of the typed domain-event queue.
    #[serde(default = "default_event_queue_size")]
    pub event_queue_size: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            event_queue_size: default_event_queue_size(),
        }
    }
}

fn default_event_queue_size() -> usize {
    1024
}
