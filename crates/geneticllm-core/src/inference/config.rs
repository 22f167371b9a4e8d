//! Endpoint configuration and wire format selection.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::settings::{DEFAULT_MAX_NEW_TOKENS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TEMPERATURE, Settings};

/// Shared OpenAI-compatible router used when no dedicated endpoint is configured.
pub const CHAT_COMPLETIONS_ROUTER_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Upstream wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Raw prompt in, generated text out.
    DedicatedGeneration,
    /// OpenAI-style messages in, choices out.
    ChatCompletions,
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DedicatedGeneration => f.write_str("dedicated-generation"),
            Self::ChatCompletions => f.write_str("chat-completions"),
        }
    }
}

/// Everything the inference adapter needs to reach its upstream.
#[derive(Clone, PartialEq)]
pub struct EndpointConfig {
    pub kind: EndpointKind,
    pub url: String,
    pub auth_token: String,
    pub model_name: String,
    pub default_temperature: f64,
    pub default_max_tokens: u32,
    pub system_prompt: String,
    pub timeout: Duration,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("kind", &self.kind)
            .field("url", &self.url)
            .field("auth_token", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("system_prompt", &self.system_prompt)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl EndpointConfig {
    /// Target a dedicated text-generation endpoint.
    pub fn dedicated(
        url: impl Into<String>,
        auth_token: impl Into<String>,
        model_name: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            EndpointKind::DedicatedGeneration,
            url.into(),
            auth_token.into(),
            model_name.into(),
            system_prompt.into(),
        )
    }

    /// Target the shared chat-completions router.
    pub fn chat_completions(
        auth_token: impl Into<String>,
        model_name: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            EndpointKind::ChatCompletions,
            CHAT_COMPLETIONS_ROUTER_URL.to_string(),
            auth_token.into(),
            model_name.into(),
            system_prompt.into(),
        )
    }

    fn with_kind(
        kind: EndpointKind,
        url: String,
        auth_token: String,
        model_name: String,
        system_prompt: String,
    ) -> Self {
        Self {
            kind,
            url,
            auth_token,
            model_name,
            default_temperature: DEFAULT_TEMPERATURE,
            default_max_tokens: DEFAULT_MAX_NEW_TOKENS,
            system_prompt,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// A non-blank dedicated URL selects dedicated-generation; anything
    /// else selects chat-completions against the shared router.
    pub fn from_settings(settings: &Settings) -> Self {
        let config = match settings.dedicated_endpoint_url() {
            Some(url) => Self::dedicated(
                url,
                settings.hf_token.clone(),
                settings.model_name.clone(),
                settings.system_prompt.clone(),
            ),
            None => Self::chat_completions(
                settings.hf_token.clone(),
                settings.model_name.clone(),
                settings.system_prompt.clone(),
            ),
        };
        config
            .with_generation_defaults(settings.temperature, settings.max_new_tokens)
            .with_timeout(settings.request_timeout())
    }

    #[must_use]
    pub const fn with_generation_defaults(mut self, temperature: f64, max_tokens: u32) -> Self {
        self.default_temperature = temperature;
        self.default_max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
