//! scriptqa CLI entry point.

use anyhow::Result;
use clap::Parser;
use scriptqa::cli::{commands, Cli};
use scriptqa::config::Settings;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file; a missing file is fine.
    let dotenv = dotenvy::dotenv();
    if let Err(e) = &dotenv {
        if !e.not_found() {
            anyhow::bail!("Failed to load .env: {}", e);
        }
    }

    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scriptqa={}", cli.log_level())),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Ok(path) = &dotenv {
        debug!("Loaded environment from {:?}", path);
    }

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    commands::run_query(&cli.query_text, &settings).await
}
