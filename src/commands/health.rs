//! Health command - probe the snapshot and the API.

use std::path::Path;

use anyhow::{Result, bail};
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct HealthCmd;

impl HealthCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;
        let report = resolver.health().await;

        println!("{}", format::health(&report));

        if !report.healthy() {
            bail!("health check failed");
        }
        Ok(())
    }
}
