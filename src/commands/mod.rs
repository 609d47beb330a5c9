//! CLI command implementations.

mod advisories;
mod config;
mod dependents;
mod get;
mod health;
mod info;
mod lookup;
mod registries;
mod repo;
mod search;
mod serve;
mod versions;

pub use advisories::AdvisoriesCmd;
pub use config::ConfigCmd;
pub use dependents::DependentsCmd;
pub use get::GetCmd;
pub use health::HealthCmd;
pub use info::InfoCmd;
pub use lookup::LookupCmd;
pub use registries::RegistriesCmd;
pub use repo::RepoCmd;
pub use search::SearchCmd;
pub use serve::ServeCmd;
pub use versions::VersionsCmd;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::local::{self, LocalConfig, LocalStore};
use crate::remote::ApiClient;
use crate::resolve::Resolver;
use crate::types::LookupError;

/// Build a resolver from the config file, with `db` taking precedence over
/// the configured snapshot path.
pub async fn build_resolver(db: Option<&Path>) -> Result<Resolver> {
    let config = LocalConfig::load()?;
    let explicit = db.or(config.database_path.as_deref());

    let store = LocalStore::discover(&local::candidate_paths(explicit)).await;
    let api = ApiClient::with_base_url(config.api_base_url.clone()).map_err(report)?;
    debug!(api = api.base_url(), timeout_ms = config.timeout_ms, "resolver configured");

    Ok(Resolver::new(store, api).with_timeout(config.timeout()))
}

/// Turn a lookup failure into its one-line report.
pub fn report(e: LookupError) -> anyhow::Error {
    anyhow::anyhow!(e.report().to_string())
}
