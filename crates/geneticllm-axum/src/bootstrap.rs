//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the gateway. The reqwest transport is instantiated here.

use std::sync::Arc;

use anyhow::Result;
use geneticllm_core::{
    AccessGate, CredentialSet, EndpointConfig, InferenceService, ReqwestTransport, Settings,
    UpstreamTransport,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::routes::create_router;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

impl CorsConfig {
    /// A list containing `*` allows everything.
    pub fn from_origins(origins: Vec<String>) -> Self {
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins)
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            cors: CorsConfig::from_origins(settings.cors_origins_list()),
        }
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// API key check applied to `/api/v1/*`.
    pub gate: AccessGate,
    /// Upstream inference adapter.
    pub inference: Arc<InferenceService>,
}

/// Build the context with the production reqwest transport.
pub fn bootstrap(settings: &Settings) -> Result<AxumContext> {
    let transport = ReqwestTransport::new()?;
    Ok(bootstrap_with_transport(settings, Arc::new(transport)))
}

/// Build the context around an injected transport.
pub fn bootstrap_with_transport(
    settings: &Settings,
    transport: Arc<dyn UpstreamTransport>,
) -> AxumContext {
    let endpoint = EndpointConfig::from_settings(settings);
    let gate = AccessGate::new(CredentialSet::from_settings(settings));

    AxumContext {
        gate,
        inference: Arc::new(InferenceService::new(endpoint, transport)),
    }
}

fn log_startup(settings: &Settings, ctx: &AxumContext) {
    let endpoint = ctx.inference.config();
    info!(
        model = %endpoint.model_name,
        endpoint = %endpoint.kind,
        url = %endpoint.url,
        timeout_secs = endpoint.timeout.as_secs(),
        api_keys = ctx.gate.credentials().len(),
        "GeneticLLM gateway configured"
    );

    if settings.hf_token.trim().is_empty() {
        warn!("HF_TOKEN is empty; upstream calls will be rejected");
    }
    if !ctx.gate.is_enabled() {
        warn!("No API keys configured - running in development mode without authentication");
    }
}

/// Validate settings, bind, and serve until Ctrl-C or SIGTERM.
pub async fn start_server(settings: Settings) -> Result<()> {
    settings.validate()?;

    let ctx = bootstrap(&settings)?;
    log_startup(&settings, &ctx);

    let config = ServerConfig::from_settings(&settings);
    let app = create_router(ctx, &config.cors);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("GeneticLLM gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("GeneticLLM gateway shut down");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Shutdown signal received");
}
