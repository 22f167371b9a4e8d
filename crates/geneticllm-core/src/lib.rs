#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod auth;
pub mod chat;
pub mod inference;
pub mod settings;
pub mod transport;

// Re-export commonly used types for convenience
pub use auth::{AccessGate, AuthError, CredentialSet, DEV_MODE_IDENTITY, Identity};
pub use chat::{
    CONVERSATION_ID_LEN, ChatReply, ChatRequest, MAX_MESSAGE_CHARS, MAX_TOKENS_RANGE,
    TEMPERATURE_RANGE, ValidationError, new_conversation_id, resolve_conversation_id,
};
pub use inference::{
    CHAT_COMPLETIONS_ROUTER_URL, EndpointConfig, EndpointKind, InferenceError, InferenceService,
};
pub use settings::{Settings, SettingsError};
pub use transport::{ReqwestTransport, TransportError, UpstreamResponse, UpstreamTransport};
