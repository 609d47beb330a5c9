//! CLI argument definitions.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::commands::{
    AdvisoriesCmd, ConfigCmd, DependentsCmd, GetCmd, HealthCmd, InfoCmd, LookupCmd, RegistriesCmd,
    RepoCmd, SearchCmd, ServeCmd, VersionsCmd,
};

#[derive(Parser)]
#[command(name = "ecosystems-mcp")]
#[command(about = "Package metadata from a local ecosyste.ms snapshot, with API fallback")]
#[command(version)]
pub struct Cli {
    /// Snapshot database to try before the default locations
    #[arg(long, global = true, env = "ECOSYSTEMS_DB_PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Command::Serve(_))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Run as MCP server over stdio (for AI tools)
    Serve(ServeCmd),

    /// Get a package by ecosystem and name
    Get(GetCmd),

    /// Find packages by purl, ecosystem+name, or repository URL
    Lookup(LookupCmd),

    /// List package versions, newest first
    Versions(VersionsCmd),

    /// Show security advisories for a package
    Advisories(AdvisoriesCmd),

    /// Show source repository metadata for a package
    Repo(RepoCmd),

    /// List packages that depend on a package
    Dependents(DependentsCmd),

    /// Search the local database by keyword
    Search(SearchCmd),

    /// List registries known to the API
    Registries(RegistriesCmd),

    /// Show local database statistics
    Info(InfoCmd),

    /// Check database and API availability
    Health(HealthCmd),

    /// Manage configuration
    Config(ConfigCmd),
}

impl Command {
    pub async fn execute(&self, db: Option<&Path>) -> anyhow::Result<()> {
        match self {
            Command::Serve(cmd) => cmd.run(db).await,
            Command::Get(cmd) => cmd.run(db).await,
            Command::Lookup(cmd) => cmd.run(db).await,
            Command::Versions(cmd) => cmd.run(db).await,
            Command::Advisories(cmd) => cmd.run(db).await,
            Command::Repo(cmd) => cmd.run(db).await,
            Command::Dependents(cmd) => cmd.run(db).await,
            Command::Search(cmd) => cmd.run(db).await,
            Command::Registries(cmd) => cmd.run(db).await,
            Command::Info(cmd) => cmd.run(db).await,
            Command::Health(cmd) => cmd.run(db).await,
            Command::Config(cmd) => cmd.run().await,
        }
    }
}
