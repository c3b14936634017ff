//! Binary crate for the `chautari` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Scanning a page description for weather widgets
//! - Running the refresh loop and printing widgets to the terminal

use clap::Parser;

mod cli;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
