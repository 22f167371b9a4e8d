//! Process configuration for the gateway.
//!
//! `Settings` is a plain value. The binary builds it once at startup (from
//! CLI flags, environment variables and `.env`) and hands it to the
//! components that need it. Nothing in this module reads the environment.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::chat::{MAX_TOKENS_RANGE, TEMPERATURE_RANGE};

/// Default bind host for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port for the HTTP server.
pub const DEFAULT_PORT: u16 = 8000;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default generation length when the caller omits `max_tokens`.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;

/// Default sampling temperature when the caller omits `temperature`.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default upstream call bound, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

/// Value of `cors_origins` meaning "allow every origin".
pub const CORS_ALLOW_ALL: &str = "*";

/// Application settings.
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// Bearer token sent to the upstream inference endpoint.
    pub hf_token: String,
    /// Model name reported to callers and sent in chat-completions payloads.
    pub model_name: String,
    /// Dedicated text-generation endpoint. `None` or blank selects the shared router.
    pub hf_endpoint_url: Option<String>,
    /// Comma-separated API key allow-list. Empty disables authentication.
    pub api_keys: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_new_tokens: u32,
    pub temperature: f64,
    /// Upstream request bound in seconds.
    pub request_timeout_secs: u64,
    /// System prompt injected ahead of every user message.
    pub system_prompt: String,
    /// Comma-separated CORS origins, or `*`.
    pub cors_origins: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("hf_token", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("hf_endpoint_url", &self.hf_endpoint_url)
            .field("api_keys", &format_args!("<{} keys>", self.api_keys_list().len()))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("system_prompt", &self.system_prompt)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl Settings {
    /// Create settings for the given token, model and system prompt with
    /// every other field at its default.
    pub fn new(
        hf_token: impl Into<String>,
        model_name: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            hf_token: hf_token.into(),
            model_name: model_name.into(),
            hf_endpoint_url: None,
            api_keys: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            system_prompt: system_prompt.into(),
            cors_origins: CORS_ALLOW_ALL.to_string(),
        }
    }

    /// Route generation to a dedicated text-generation endpoint.
    #[must_use]
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.hf_endpoint_url = Some(url.into());
        self
    }

    /// Set the comma-separated API key allow-list.
    #[must_use]
    pub fn with_api_keys(mut self, keys: impl Into<String>) -> Self {
        self.api_keys = keys.into();
        self
    }

    /// Set the default generation parameters.
    #[must_use]
    pub const fn with_generation_defaults(mut self, temperature: f64, max_new_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// Set the upstream request bound.
    #[must_use]
    pub const fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the comma-separated CORS origins.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: impl Into<String>) -> Self {
        self.cors_origins = origins.into();
        self
    }

    /// The dedicated endpoint URL, if one is configured and non-blank.
    pub fn dedicated_endpoint_url(&self) -> Option<&str> {
        self.hf_endpoint_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// API keys in configured order, trimmed, without blanks or duplicates.
    pub fn api_keys_list(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for key in self.api_keys.split(',').map(str::trim) {
            if !key.is_empty() && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// CORS origins as a list. `["*"]` means every origin is allowed.
    pub fn cors_origins_list(&self) -> Vec<String> {
        let raw = self.cors_origins.trim();
        if raw.is_empty() || raw == CORS_ALLOW_ALL {
            return vec![CORS_ALLOW_ALL.to_string()];
        }
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// The upstream request bound.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the settings for values the gateway cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.model_name.trim().is_empty() {
            return Err(SettingsError::EmptyModelName);
        }
        if !TEMPERATURE_RANGE.contains(&self.temperature) {
            return Err(SettingsError::InvalidTemperature(self.temperature));
        }
        if !MAX_TOKENS_RANGE.contains(&self.max_new_tokens) {
            return Err(SettingsError::InvalidMaxNewTokens(self.max_new_tokens));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        if let Some(raw) = self.dedicated_endpoint_url() {
            let url = Url::parse(raw).map_err(|e| SettingsError::InvalidEndpointUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(SettingsError::InvalidEndpointUrl {
                    url: raw.to_string(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
        }
        Ok(())
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Model name cannot be empty")]
    EmptyModelName,

    #[error("Default temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f64),

    #[error("Default max new tokens must be between 1 and 2048, got {0}")]
    InvalidMaxNewTokens(u32),

    #[error("Request timeout must be at least one second")]
    ZeroTimeout,

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpointUrl { url: String, reason: String },
}
