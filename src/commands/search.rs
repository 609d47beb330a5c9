//! Search command - full-text search over the local snapshot.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct SearchCmd {
    /// Keywords to search for
    pub query: String,

    /// Max results
    #[arg(short, long, default_value = "20")]
    pub limit: u32,
}

impl SearchCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;

        let start = std::time::Instant::now();
        let outcome = resolver
            .search(&self.query, self.limit)
            .await
            .map_err(super::report)?;

        println!("{}", format::search_report(&self.query, &outcome));
        tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "search finished");
        Ok(())
    }
}
