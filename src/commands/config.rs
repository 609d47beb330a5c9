//! Config command - manage local configuration.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use crate::local::LocalConfig;

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub command: ConfigSubCmd,
}

#[derive(Subcommand)]
pub enum ConfigSubCmd {
    /// Set the snapshot database path
    SetDb(SetDbCmd),

    /// Set the request timeout in milliseconds (default: 30000)
    SetTimeout(SetTimeoutCmd),

    /// Set the API base URL (default: https://packages.ecosyste.ms/api/v1)
    SetApiUrl(SetApiUrlCmd),

    /// Show current configuration
    Show,
}

#[derive(Args)]
pub struct SetDbCmd {
    /// Path to critical-packages.db
    pub path: PathBuf,
}

#[derive(Args)]
pub struct SetTimeoutCmd {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
}

#[derive(Args)]
pub struct SetApiUrlCmd {
    /// API base URL
    pub url: String,
}

impl ConfigCmd {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            ConfigSubCmd::SetDb(cmd) => {
                if !cmd.path.is_file() {
                    bail!("No database file at {}", cmd.path.display());
                }
                let mut config = LocalConfig::load()?;
                config.database_path = Some(cmd.path.clone());
                config.save()?;
                println!("Database path set to: {}", cmd.path.display());
            }
            ConfigSubCmd::SetTimeout(cmd) => {
                if cmd.timeout_ms == 0 {
                    bail!("Timeout must be greater than zero");
                }
                let mut config = LocalConfig::load()?;
                config.timeout_ms = cmd.timeout_ms;
                config.save()?;
                println!("Timeout set to: {}ms", cmd.timeout_ms);
            }
            ConfigSubCmd::SetApiUrl(cmd) => {
                if url::Url::parse(&cmd.url).is_err() {
                    bail!("Invalid URL: {}", cmd.url);
                }
                let mut config = LocalConfig::load()?;
                config.api_base_url = cmd.url.clone();
                config.save()?;
                println!("API base URL set to: {}", cmd.url);
            }
            ConfigSubCmd::Show => {
                let config = LocalConfig::load()?;
                println!("Config: {}", LocalConfig::config_path()?.display());
                println!();
                println!(
                    "database_path: {}",
                    config
                        .database_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(auto)".to_string())
                );
                println!("api_base_url:  {}", config.api_base_url);
                println!("timeout_ms:    {}", config.timeout_ms);
            }
        }
        Ok(())
    }
}
