//! songplay-etl CLI
//!
//! Runs the star-schema ETL. With no arguments it reads the default source
//! bucket and writes the default destination bucket.

use clap::Parser;
use songplay_etl::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        if !e.is_startup_failure() {
            // No rollback: tables finished before the failure stay written
            tracing::error!("Run aborted after output was modified");
        }
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
