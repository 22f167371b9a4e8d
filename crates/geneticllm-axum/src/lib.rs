#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependency only exercised by the integration tests
#[cfg(test)]
use http_body_util as _;

// Used by main.rs binary
use dotenvy as _;

pub mod auth;
pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod telemetry;

// Re-export primary types
pub use auth::{API_KEY_HEADER, require_api_key};
pub use bootstrap::{
    AxumContext, CorsConfig, ServerConfig, bootstrap, bootstrap_with_transport, shutdown_signal,
    start_server,
};
pub use cli::Cli;
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
pub use telemetry::init_tracing;
