//! Info command - show local snapshot statistics.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::format;

#[derive(Args)]
pub struct InfoCmd;

impl InfoCmd {
    pub async fn run(&self, db: Option<&Path>) -> Result<()> {
        let resolver = super::build_resolver(db).await?;

        if let Some(path) = resolver.local().path() {
            println!("Database: {}\n", path.display());
        }

        let info = resolver.database_info().await.map_err(super::report)?;
        println!("{}", format::database_info(info.as_ref()));
        Ok(())
    }
}
