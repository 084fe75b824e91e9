//! Taskpad CLI - command line interface for taskpad task tracking

use clap::Parser;
use taskpad_cli::{run_command, Cli};
use taskpad_core::{TaskpadConfig, TaskpadDatabase};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Verbose forces debug; otherwise honor RUST_LOG, defaulting to info
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.database {
        Some(path) => TaskpadConfig::new(path),
        None => TaskpadConfig::from_env(),
    };
    let db = TaskpadDatabase::with_config(&config).await?;

    run_command(&db, cli.command, &mut std::io::stdout()).await?;

    Ok(())
}
