//! Versions command - list releases, newest first.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct VersionsCmd {
    /// Ecosystem (npm, pypi, cargo, ...)
    pub ecosystem: String,

    /// Package name
    pub name: String,
}

impl VersionsCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;
        let versions = resolver
            .get_versions(&self.ecosystem, &self.name)
            .await
            .map_err(super::report)?;

        println!("{}", format::versions_report(&self.ecosystem, &self.name, &versions.value));
        println!("\n(source: {})", versions.source);
        Ok(())
    }
}
