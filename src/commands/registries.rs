//! Registries command - list registries known to the API.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct RegistriesCmd;

impl RegistriesCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;
        let registries = resolver.list_registries().await.map_err(super::report)?;

        println!("{}", format::registries(&registries));
        Ok(())
    }
}
