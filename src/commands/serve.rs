//! Serve command - run as an MCP server.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::mcp;

#[derive(Args)]
pub struct ServeCmd;

impl ServeCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        // Logging to stderr (stdout is for MCP protocol)
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let resolver = super::build_resolver(db).await?;
        mcp::run(resolver).await
    }
}
