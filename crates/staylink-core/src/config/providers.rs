//! External push/bot provider configuration.

use serde::{Deserialize, Serialize};

/// Push gateway and bot relay settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    /// Push gateway settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Bot relay settings.
    #[serde(default)]
    pub bot: BotConfig,
}

/// Push gateway (FCM-compatible HTTP endpoint) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Gateway endpoint URL.
    #[serde(default = "default_push_url")]
    pub url: String,
    /// Server API key sent as a bearer token.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Bot relay (Telegram-compatible) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Relay API base URL.
    #[serde(default = "default_bot_url")]
    pub api_url: String,
    /// Bot token appended to the base URL.
    #[serde(default)]
    pub token: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            url: default_push_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_url: default_bot_url(),
            token: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_push_url() -> String {
    "https://fcm.googleapis.com/fcm/send".to_string()
}

fn default_bot_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout() -> u64 {
    10
}
