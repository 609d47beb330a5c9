//! Advisories command - show known security advisories.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct AdvisoriesCmd {
    /// Ecosystem (npm, pypi, cargo, ...)
    pub ecosystem: String,

    /// Package name
    pub name: String,
}

impl AdvisoriesCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;
        let advisories = resolver
            .get_advisories(&self.ecosystem, &self.name)
            .await
            .map_err(super::report)?;

        println!(
            "{}",
            format::advisories_report(&self.ecosystem, &self.name, &advisories.value)
        );
        println!("\n(source: {})", advisories.source);
        Ok(())
    }
}
