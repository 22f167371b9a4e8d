//! Inbound chat request, its bounds, and the normalized reply.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum message length, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Accepted sampling temperature range.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=2.0;

/// Accepted `max_tokens` range.
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 1..=2048;

/// Length of a generated conversation identifier.
pub const CONVERSATION_ID_LEN: usize = 8;

/// A single chat turn from a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message.
    pub message: String,
    /// Opaque identifier echoed back to the caller. Generated when absent.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Sampling temperature override.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Generation length override.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Check the request against the accepted bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.message.chars().count();
        if len == 0 {
            return Err(ValidationError::EmptyMessage);
        }
        if len > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong {
                len,
                max: MAX_MESSAGE_CHARS,
            });
        }
        if let Some(temperature) = self.temperature
            && !TEMPERATURE_RANGE.contains(&temperature)
        {
            return Err(ValidationError::TemperatureOutOfRange(temperature));
        }
        if let Some(max_tokens) = self.max_tokens
            && !MAX_TOKENS_RANGE.contains(&max_tokens)
        {
            return Err(ValidationError::MaxTokensOutOfRange(max_tokens));
        }
        Ok(())
    }
}

/// Chat request validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message is {len} characters, at most {max} are allowed")]
    MessageTooLong { len: usize, max: usize },

    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    TemperatureOutOfRange(f64),

    #[error("max_tokens must be between 1 and 2048, got {0}")]
    MaxTokensOutOfRange(u32),
}

/// Normalized result of one generation, returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Model response.
    pub response: String,
    /// Conversation ID for follow-up.
    pub conversation_id: String,
    /// Model used for generation.
    pub model: String,
}

/// Generate a short opaque conversation identifier.
pub fn new_conversation_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(CONVERSATION_ID_LEN);
    id
}

/// Use the caller's identifier when present and non-empty, otherwise mint one.
pub fn resolve_conversation_id(supplied: Option<&str>) -> String {
    match supplied {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => new_conversation_id(),
    }
}
