//! Push gateway client (FCM-compatible legacy HTTP API).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use staylink_core::config::providers::PushConfig;
use staylink_core::error::{AppError, ErrorKind};
use staylink_core::result::AppResult;
use staylink_core::traits::{PushOutcome, PushSender};

/// Token error codes that mean the token is gone for good.
const DEAD_TOKEN_ERRORS: [&str; 2] = ["NotRegistered", "InvalidRegistration"];

/// Per-token result entry in the gateway response.
#[derive(Debug, Deserialize)]
struct PushResult {
    #[serde(default)]
    error: Option<String>,
}

/// Gateway response body.
#[derive(Debug, Deserialize)]
struct PushResponse {
    #[serde(default)]
    results: Vec<PushResult>,
}

/// Sends push notifications through an FCM-compatible HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpPushSender {
    client: reqwest::Client,
    config: PushConfig,
}

impl HttpPushSender {
    /// Create a new push sender from provider configuration.
    pub fn new(config: PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Provider, "Failed to build push client", e)
            })?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> AppResult<PushOutcome> {
        let payload = serde_json::json!({
            "registration_ids": tokens,
            "notification": { "title": title, "body": body },
            "data": data,
        });

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Provider, "Push request failed", e))?;

        if !response.status().is_success() {
            return Err(AppError::provider(format!(
                "Push gateway returned {}",
                response.status()
            )));
        }

        let parsed: PushResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Provider, "Invalid push gateway response", e)
        })?;

        let mut outcome = PushOutcome::default();
        for (token, result) in tokens.iter().zip(parsed.results.iter()) {
            match &result.error {
                None => outcome.delivered += 1,
                Some(code) if DEAD_TOKEN_ERRORS.contains(&code.as_str()) => {
                    outcome.invalid_tokens.push(token.clone());
                }
                Some(code) => {
                    debug!(error = %code, "Push rejected for one token");
                }
            }
        }

        Ok(outcome)
    }
}
