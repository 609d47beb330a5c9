//! Lookup command - find packages by purl, identity or repository URL.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;
use crate::resolve::LookupRequest;

#[derive(Args)]
pub struct LookupCmd {
    /// Package URL (e.g. pkg:npm/lodash@4.17.21)
    #[arg(long)]
    pub purl: Option<String>,

    /// Ecosystem, used together with --name
    #[arg(long, short = 'e')]
    pub ecosystem: Option<String>,

    /// Package name, used together with --ecosystem
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Source repository URL
    #[arg(long)]
    pub repository_url: Option<String>,

    /// Print the raw result as JSON
    #[arg(long)]
    pub json: bool,
}

impl LookupCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let request = LookupRequest::from_parts(
            self.purl.as_deref(),
            self.ecosystem.as_deref(),
            self.name.as_deref(),
            self.repository_url.as_deref(),
        )
        .map_err(super::report)?;

        let resolver = super::build_resolver(db).await?;
        let result = resolver.lookup(&request).await.map_err(super::report)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", format::lookup(&result));
            println!("\n(source: {})", result.source);
        }
        Ok(())
    }
}
