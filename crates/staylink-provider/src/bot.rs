//! Bot relay client (Telegram-compatible sendMessage API).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use staylink_core::config::providers::BotConfig;
use staylink_core::error::{AppError, ErrorKind};
use staylink_core::result::AppResult;
use staylink_core::traits::BotSender;

/// Relay response envelope.
#[derive(Debug, Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends chat messages through the bot relay HTTP API.
#[derive(Debug, Clone)]
pub struct BotRelaySender {
    client: reqwest::Client,
    config: BotConfig,
}

impl BotRelaySender {
    /// Create a new bot sender from provider configuration.
    pub fn new(config: BotConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Provider, "Failed to build bot client", e)
            })?;
        Ok(Self { client, config })
    }

    fn send_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.token
        )
    }
}

#[async_trait]
impl BotSender for BotRelaySender {
    async fn send(&self, chat_id: &str, text: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.send_url())
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Provider, "Bot request failed", e))?;

        if !response.status().is_success() {
            return Err(AppError::provider(format!(
                "Bot relay returned {}",
                response.status()
            )));
        }

        let parsed: BotResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Provider, "Invalid bot relay response", e)
        })?;

        if !parsed.ok {
            return Err(AppError::provider(format!(
                "Bot relay rejected message: {}",
                parsed.description.unwrap_or_else(|| "unknown".to_string())
            )));
        }

        Ok(())
    }
}
