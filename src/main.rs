//! ecosystems-mcp - package metadata lookups over a local snapshot and the
//! ecosyste.ms API.

mod cli;
mod commands;
mod format;
mod local;
mod mcp;
mod registry;
mod remote;
mod resolve;
mod types;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Serve mode inits its own subscriber (writes to stderr), so skip here
    if !cli.is_serve() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    cli.command.execute(cli.db.as_deref()).await
}
