//! Get command - look up a package by ecosystem and name.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct GetCmd {
    /// Ecosystem (npm, pypi, cargo, ...)
    pub ecosystem: String,

    /// Package name
    pub name: String,
}

impl GetCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;
        let result = resolver
            .get_package(&self.ecosystem, &self.name)
            .await
            .map_err(super::report)?;

        println!("{}", format::lookup(&result));
        println!("\n(source: {})", result.source);
        Ok(())
    }
}
