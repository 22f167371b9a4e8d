//! Tracing subscriber setup for the binary.

use geneticllm_core::settings::DEFAULT_LOG_LEVEL;
use tracing_subscriber::EnvFilter;

/// Build the log filter from the process environment.
pub fn env_filter(default_level: &str) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_filter(rust_log.as_deref(), default_level)
}

/// `rust_log` wins when it parses; otherwise `default_level`, and `info`
/// when that does not parse either.
fn resolve_filter(rust_log: Option<&str>, default_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(default_level.to_ascii_lowercase()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}
