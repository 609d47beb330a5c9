//! Repo command - show source repository metadata.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct RepoCmd {
    /// Ecosystem (npm, pypi, cargo, ...)
    pub ecosystem: String,

    /// Package name
    pub name: String,
}

impl RepoCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;
        let repo = resolver
            .get_repository(&self.ecosystem, &self.name)
            .await
            .map_err(super::report)?;

        println!("{}", format::repository_report(&self.ecosystem, &self.name, &repo.value));
        println!("\n(source: {})", repo.source);
        Ok(())
    }
}
