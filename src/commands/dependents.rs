//! Dependents command - list reverse dependencies from the API.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct DependentsCmd {
    /// Ecosystem (npm, pypi, cargo, ...)
    pub ecosystem: String,

    /// Package name
    pub name: String,

    /// Page number
    #[arg(long, short = 'p')]
    pub page: Option<u32>,

    /// Results per page (max 100)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Print the raw result as JSON
    #[arg(long)]
    pub json: bool,
}

impl DependentsCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;
        let dependents = resolver
            .get_dependents(&self.ecosystem, &self.name, self.page, self.per_page)
            .await
            .map_err(super::report)?;

        if self.json {
            println!("{}", format::dependents(&dependents));
            return Ok(());
        }

        if dependents.value.is_empty() {
            println!("No dependents found for {}/{}.", self.ecosystem, self.name);
            return Ok(());
        }

        println!("Dependents of {}/{}:\n", self.ecosystem, self.name);
        for pkg in &dependents.value {
            println!(
                "{}/{} ({} downloads)",
                pkg.ecosystem,
                pkg.name,
                format::format_number(pkg.downloads)
            );
        }
        Ok(())
    }
}
