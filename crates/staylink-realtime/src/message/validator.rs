//! Message validation rules.
//!
//! Rules are plain data so the bounds stay visible in one place and
//! configurable per deployment.

use staylink_core::error::AppError;
use staylink_core::types::MessageId;

/// Length bounds applied to chat message text.
#[derive(Debug, Clone, Copy)]
pub struct TextRules {
    /// Minimum text length in characters.
    pub min_chars: usize,
    /// Maximum text length in characters.
    pub max_chars: usize,
}

impl Default for TextRules {
    fn default() -> Self {
        Self {
            min_chars: 1,
            max_chars: 1000,
        }
    }
}

impl TextRules {
    /// Validate message text against the bounds.
    pub fn check(&self, text: &str) -> Result<(), AppError> {
        let len = text.chars().count();
        if len < self.min_chars {
            return Err(AppError::validation("Message text must not be empty"));
        }
        if len > self.max_chars {
            return Err(AppError::validation(format!(
                "Message text exceeds {} characters",
                self.max_chars
            )));
        }
        Ok(())
    }
}

/// Reject an empty id list before it reaches the store.
pub fn require_ids(ids: &[MessageId]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::validation("Message id list must not be empty"));
    }
    Ok(())
}
