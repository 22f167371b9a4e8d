//! Upstream wire formats.
//!
//! Request payloads for both endpoint kinds, the reply shapes they return,
//! and the helpers that turn a raw reply into clean text.

use serde::{Deserialize, Serialize};

use super::config::EndpointKind;
use super::error::InferenceError;

/// Fixed repetition penalty sent to dedicated-generation endpoints.
pub const REPETITION_PENALTY: f64 = 1.2;

/// End-of-turn markers the target model's tokenizer may leave in its output.
pub const END_OF_TURN_MARKERS: [&str; 3] = ["<|im_end|>", "<|endoftext|>", "</s>"];

/// Build the ChatML prompt for a dedicated-generation endpoint.
///
/// The markup is byte-exact; the fine-tuned model was conditioned on it.
pub fn format_prompt(system_prompt: &str, message: &str) -> String {
    format!(
        "<|im_start|>system{system_prompt}<|im_end|><|im_start|>user{message}<|im_end|><|im_start|>assistant"
    )
}

// ============================================================================
// Request payloads
// ============================================================================

/// Dedicated-generation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGenerationRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub do_sample: bool,
    pub return_full_text: bool,
    pub repetition_penalty: f64,
}

/// Chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body in whichever format the endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpstreamPayload {
    TextGeneration(TextGenerationRequest),
    ChatCompletion(ChatCompletionRequest),
}

impl UpstreamPayload {
    /// Build the payload for `kind`.
    pub fn build(
        kind: EndpointKind,
        model_name: &str,
        system_prompt: &str,
        message: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        match kind {
            EndpointKind::DedicatedGeneration => Self::TextGeneration(TextGenerationRequest {
                inputs: format_prompt(system_prompt, message),
                parameters: GenerationParameters {
                    max_new_tokens: max_tokens,
                    temperature,
                    do_sample: true,
                    return_full_text: false,
                    repetition_penalty: REPETITION_PENALTY,
                },
            }),
            EndpointKind::ChatCompletions => Self::ChatCompletion(ChatCompletionRequest {
                model: model_name.to_string(),
                messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(message)],
                max_tokens,
                temperature,
            }),
        }
    }
}

// ============================================================================
// Reply shapes
// ============================================================================

/// Dedicated-generation reply: a list or a bare object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextGenerationReply {
    Batch(Vec<BatchItem>),
    Single(GeneratedText),
}

/// List element of a dedicated-generation reply. A missing field reads as
/// empty text, which the empty-response check then rejects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchItem {
    #[serde(default)]
    pub generated_text: Option<String>,
}

/// Bare-object dedicated-generation reply; the field is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// Chat-completions reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatCompletionReply {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Decoded upstream reply, tagged by the endpoint kind that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamReply {
    Generation(TextGenerationReply),
    Chat(ChatCompletionReply),
}

impl UpstreamReply {
    /// Decode `body` with the schema for `kind`. Shape mismatches are errors.
    pub fn decode(kind: EndpointKind, body: &str) -> Result<Self, InferenceError> {
        let reply = match kind {
            EndpointKind::DedicatedGeneration => serde_json::from_str(body).map(Self::Generation),
            EndpointKind::ChatCompletions => serde_json::from_str(body).map(Self::Chat),
        };
        reply.map_err(|e| InferenceError::MalformedReply(format!("{kind} reply: {e}")))
    }

    /// Pull the raw generated text out of the reply.
    pub fn into_text(self) -> Result<String, InferenceError> {
        match self {
            Self::Generation(TextGenerationReply::Batch(items)) => items
                .into_iter()
                .next()
                .map(|item| item.generated_text.unwrap_or_default())
                .ok_or_else(|| {
                    InferenceError::MalformedReply("generation list is empty".to_string())
                }),
            Self::Generation(TextGenerationReply::Single(single)) => Ok(single.generated_text),
            Self::Chat(reply) => {
                let choice = reply.choices.into_iter().next().ok_or_else(|| {
                    InferenceError::MalformedReply("choices list is empty".to_string())
                })?;
                choice.message.content.ok_or_else(|| {
                    InferenceError::MalformedReply("choices[0].message.content is missing".to_string())
                })
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Best diagnostic for a non-success upstream reply.
///
/// Prefers `error.message`, then a string `error`, then the raw body, then
/// the bare status code.
pub fn upstream_error_message(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        match map.get("error") {
            Some(serde_json::Value::Object(error)) => {
                if let Some(serde_json::Value::String(message)) = error.get("message") {
                    return message.clone();
                }
            }
            Some(serde_json::Value::String(message)) => return message.clone(),
            _ => {}
        }
    }

    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

/// Trim the reply and strip trailing end-of-turn markers.
///
/// Markers are removed until none remains at the very end, so applying
/// this twice gives the same result as applying it once.
pub fn clean_response(text: &str) -> String {
    let mut cleaned = text.trim();
    while let Some(stripped) = END_OF_TURN_MARKERS
        .iter()
        .find_map(|marker| cleaned.strip_suffix(marker))
    {
        cleaned = stripped.trim_end();
    }
    cleaned.to_string()
}

/// Cut `text` to at most `max_chars` characters for logging.
pub fn truncate_for_log(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
