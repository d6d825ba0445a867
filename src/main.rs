// ABOUTME: Entry point for the perfectwood binary.
// ABOUTME: Loads .env and configuration, initializes tracing, and dispatches the CLI command.

mod cli;
mod config;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("perfectwood=info,perfectwood_store=info")
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let config = config::AppConfig::from_env()?;
    cli::run(cli, config).await
}
