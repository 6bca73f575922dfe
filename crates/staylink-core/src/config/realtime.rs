//! Real-time engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal buffer size for per-connection outbound queues.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum concurrent sessions per user.
    #[serde(default = "default_max_sessions_per_user")]
    pub max_sessions_per_user: usize,
    /// Maximum chat message text length in characters.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            max_sessions_per_user: default_max_sessions_per_user(),
            max_text_length: default_max_text_length(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_sessions_per_user() -> usize {
    5
}

fn default_max_text_length() -> usize {
    1000
}
