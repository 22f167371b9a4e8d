//! Command-line flags for the `geneticllm` binary.
//!
//! Every flag falls back to an environment variable of the same name in
//! upper snake case, so the gateway can be configured entirely from the
//! environment or a `.env` file.

use clap::Parser;
use geneticllm_core::Settings;
use geneticllm_core::settings::{
    CORS_ALLOW_ALL, DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_MAX_NEW_TOKENS, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TEMPERATURE,
};

#[derive(Debug, Parser)]
#[command(name = "geneticllm")]
#[command(about = "API gateway for a genetics-tuned language model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Bearer token for the upstream inference endpoint
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub hf_token: String,

    /// Model name reported to callers
    #[arg(long, env = "MODEL_NAME")]
    pub model_name: String,

    /// Dedicated text-generation endpoint; omit to use the chat-completions router
    #[arg(long, env = "HF_ENDPOINT_URL")]
    pub hf_endpoint_url: Option<String>,

    /// Comma-separated API keys; empty disables authentication
    #[arg(long, env = "API_KEYS", default_value = "", hide_env_values = true)]
    pub api_keys: String,

    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Generation length when a request omits max_tokens
    #[arg(long, env = "MAX_NEW_TOKENS", default_value_t = DEFAULT_MAX_NEW_TOKENS)]
    pub max_new_tokens: u32,

    /// Sampling temperature when a request omits temperature
    #[arg(long, env = "TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// System prompt placed ahead of every user message
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: String,

    /// Comma-separated allowed CORS origins, or `*`
    #[arg(long, env = "CORS_ORIGINS", default_value = CORS_ALLOW_ALL)]
    pub cors_origins: String,
}

impl Cli {
    pub fn into_settings(self) -> Settings {
        let mut settings = Settings::new(self.hf_token, self.model_name, self.system_prompt)
            .with_api_keys(self.api_keys)
            .with_generation_defaults(self.temperature, self.max_new_tokens)
            .with_request_timeout_secs(self.request_timeout)
            .with_cors_origins(self.cors_origins);
        if let Some(url) = self.hf_endpoint_url {
            settings = settings.with_endpoint_url(url);
        }
        settings.host = self.host;
        settings.port = self.port;
        settings.log_level = self.log_level;
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const REQUIRED: [&str; 7] = [
        "geneticllm",
        "--hf-token",
        "hf_test",
        "--model-name",
        "org/genetics-llm",
        "--system-prompt",
        "You are a genetics expert.",
    ];

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_onto_settings() {
        let args = REQUIRED.iter().copied().chain([
            "--hf-endpoint-url",
            "https://abc.endpoints.huggingface.cloud",
            "--api-keys",
            "k1,k2",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--log-level",
            "debug",
            "--max-new-tokens",
            "256",
            "--temperature",
            "0.3",
            "--request-timeout",
            "30",
            "--cors-origins",
            "https://app.example",
        ]);
        let settings = Cli::try_parse_from(args).unwrap().into_settings();

        assert_eq!(settings.hf_token, "hf_test");
        assert_eq!(settings.model_name, "org/genetics-llm");
        assert_eq!(settings.system_prompt, "You are a genetics expert.");
        assert_eq!(
            settings.dedicated_endpoint_url(),
            Some("https://abc.endpoints.huggingface.cloud")
        );
        assert_eq!(settings.api_keys_list(), vec!["k1", "k2"]);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.max_new_tokens, 256);
        assert!((settings.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.cors_origins_list(), vec!["https://app.example"]);
    }

    #[test]
    fn test_missing_model_name_is_an_error() {
        let result = Cli::try_parse_from([
            "geneticllm",
            "--hf-token",
            "hf_test",
            "--system-prompt",
            "sys",
            "--model-name",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        let args = REQUIRED.iter().copied().chain(["--port", "eighty"]);
        assert!(Cli::try_parse_from(args).is_err());
    }
}
