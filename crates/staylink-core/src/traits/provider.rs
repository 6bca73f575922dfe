//! Push and bot-relay provider contracts.

use async_trait::async_trait;

use crate::result::AppResult;

/// Per-batch outcome of a push send.
#[derive(Debug, Clone, Default)]
pub struct PushOutcome {
    /// Number of tokens the provider accepted.
    pub delivered: usize,
    /// Tokens the provider reported as invalid or expired.
    ///
    /// The dispatcher deletes these from the token store.
    pub invalid_tokens: Vec<String>,
}

/// Sends a push notification to a set of device tokens.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Send `title`/`body` plus a small structured payload to every token.
    ///
    /// A transport-level failure is an error; individually rejected tokens
    /// are reported through [`PushOutcome::invalid_tokens`].
    async fn send(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> AppResult<PushOutcome>;
}

/// Sends a plain-text message to a linked bot-relay chat.
#[async_trait]
pub trait BotSender: Send + Sync {
    /// Send `text` to the chat identified by `chat_id`.
    async fn send(&self, chat_id: &str, text: &str) -> AppResult<()>;
}
