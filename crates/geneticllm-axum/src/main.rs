//! `geneticllm` binary entry point.

use clap::Parser;
use geneticllm_axum::{Cli, init_tracing, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let settings = Cli::parse().into_settings();
    init_tracing(&settings.log_level);

    start_server(settings).await
}
