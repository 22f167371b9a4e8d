//! Inference adapter.
//!
//! [`InferenceService`] turns one chat message into one upstream call and
//! normalizes whatever comes back into plain text. The wire format is
//! fixed by the [`EndpointConfig`] it is built with.

mod config;
mod error;
pub mod wire;

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::chat::{ChatReply, ChatRequest, resolve_conversation_id};
use crate::transport::UpstreamTransport;

pub use config::{CHAT_COMPLETIONS_ROUTER_URL, EndpointConfig, EndpointKind};
pub use error::InferenceError;
use wire::{UpstreamPayload, UpstreamReply, clean_response, truncate_for_log, upstream_error_message};

/// Upstream body characters kept in logs.
const LOG_BODY_CHARS: usize = 500;

/// Chat adapter over one upstream endpoint.
pub struct InferenceService {
    config: EndpointConfig,
    transport: Arc<dyn UpstreamTransport>,
}

impl InferenceService {
    pub fn new(config: EndpointConfig, transport: Arc<dyn UpstreamTransport>) -> Self {
        Self { config, transport }
    }

    pub const fn config(&self) -> &EndpointConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Build the upstream payload, falling back to configured defaults.
    pub fn build_payload(
        &self,
        message: &str,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> UpstreamPayload {
        UpstreamPayload::build(
            self.config.kind,
            &self.config.model_name,
            &self.config.system_prompt,
            message,
            temperature.unwrap_or(self.config.default_temperature),
            max_tokens.unwrap_or(self.config.default_max_tokens),
        )
    }

    /// Generate a reply to `message`.
    ///
    /// The conversation identifier is echoed back when supplied and minted
    /// otherwise. Any upstream problem becomes an [`InferenceError`].
    pub async fn generate(
        &self,
        message: &str,
        conversation_id: Option<&str>,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    ) -> Result<ChatReply, InferenceError> {
        let conversation_id = resolve_conversation_id(conversation_id);

        info!(
            conversation_id = %conversation_id,
            model = %self.config.model_name,
            endpoint = %self.config.kind,
            url = %self.config.url,
            "Generating response"
        );

        let payload = self.build_payload(message, temperature, max_tokens);
        let body = serde_json::to_value(&payload)
            .map_err(|e| InferenceError::Transport(format!("failed to encode request: {e}")))?;

        let response = self
            .transport
            .post_json(&self.config.url, &self.config.auth_token, &body, self.config.timeout)
            .await
            .map_err(|e| {
                error!(conversation_id = %conversation_id, error = %e, "Upstream call failed");
                InferenceError::from(e)
            })?;

        info!(status = response.status, "Upstream responded");
        debug!(
            body = truncate_for_log(&response.body, LOG_BODY_CHARS),
            "Upstream body"
        );

        if !response.is_success() {
            let message = upstream_error_message(response.status, &response.body);
            error!(status = response.status, error = %message, "Upstream API error");
            return Err(InferenceError::Upstream {
                status: response.status,
                message,
            });
        }

        let raw = UpstreamReply::decode(self.config.kind, &response.body)?.into_text()?;
        let text = clean_response(&raw);
        if text.is_empty() {
            warn!(conversation_id = %conversation_id, "Model returned empty response");
            return Err(InferenceError::EmptyResponse);
        }

        info!(
            conversation_id = %conversation_id,
            chars = text.chars().count(),
            "Generated response"
        );

        Ok(ChatReply {
            response: text,
            conversation_id,
            model: self.config.model_name.clone(),
        })
    }

    /// [`generate`](Self::generate) for a whole [`ChatRequest`].
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, InferenceError> {
        self.generate(
            &request.message,
            request.conversation_id.as_deref(),
            request.temperature,
            request.max_tokens,
        )
        .await
    }
}
