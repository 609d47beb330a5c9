//! Local-then-remote package resolution.
//!
//! Every operation that has a local representation asks the snapshot first
//! and only goes to the API on a miss. A local hit always wins, even when the
//! API might know something newer, and the two are never queried in
//! parallel.

mod outcome;
mod request;

pub use outcome::{ApiHealth, DatabaseHealth, HealthReport, LookupResult, Resolved, SearchOutcome};
pub use request::LookupRequest;

use std::time::{Duration, Instant};

use tracing::debug;

use crate::local::{DatabaseInfo, LocalPackage, LocalStore};
use crate::registry::{ecosystem_to_registry, parse_purl, registry_to_ecosystem};
use crate::remote::{
    ApiClient, DEFAULT_TIMEOUT, Fetch, HEALTH_TIMEOUT, PackagePayload, decode, encode_component,
};
use crate::types::{
    AdvisoryRecord, LookupError, PackageRecord, RegistrySummary, RepositoryInfo, Sourced,
    VersionRecord, sort_newest_first,
};

/// Largest page the dependents endpoint accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Registry probed by the health check.
const HEALTH_PROBE_PATH: &str = "/registries/npmjs.org";

/// A package found by identity, in whichever source answered first.
enum Identity {
    Local(LocalPackage),
    Remote(PackagePayload),
}

/// Resolves lookups against the snapshot and the API.
///
/// The snapshot handle (or its absence) is injected at construction and
/// never reopened.
pub struct Resolver<F = ApiClient> {
    local: LocalStore,
    api: F,
    timeout: Duration,
}

impl<F: Fetch> Resolver<F> {
    pub fn new(local: LocalStore, api: F) -> Self {
        Self {
            local,
            api,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    // ==================== Package Lookups ====================

    /// Resolve any kind of lookup request.
    pub async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        match request {
            LookupRequest::ByIdentity { ecosystem, name } => self.get_package(ecosystem, name).await,
            LookupRequest::ByPurl { purl } => self.lookup_purl(purl).await,
            LookupRequest::ByRepositoryUrl { url } => self.lookup_remote("repository_url", url).await,
        }
    }

    /// Look up a package by ecosystem and name.
    pub async fn get_package(&self, ecosystem: &str, name: &str) -> Result<LookupResult, LookupError> {
        Ok(match self.resolve_identity(ecosystem, name).await? {
            Identity::Local(package) => LookupResult::local(package.record),
            Identity::Remote(payload) => LookupResult::api(Resolved::One(payload.package)),
        })
    }

    async fn lookup_purl(&self, purl: &str) -> Result<LookupResult, LookupError> {
        if let Some(package) = self.local.find_package_by_purl(purl).await? {
            debug!(purl, "purl found locally");
            return Ok(LookupResult::local(package.record));
        }

        // A purl that is not indexed may still name a package we hold by
        // ecosystem and name, so go through the identity path.
        match parse_purl(purl) {
            Some(parsed) => {
                debug!(purl, version = ?parsed.version, "purl not indexed, resolving by identity");
                self.get_package(&parsed.ecosystem, &parsed.name).await
            }
            None => self.lookup_remote("purl", purl).await,
        }
    }

    /// Cross-registry lookup by purl or repository URL.
    async fn lookup_remote(&self, key: &str, value: &str) -> Result<LookupResult, LookupError> {
        let payload = self
            .api
            .get("/packages/lookup", &[(key, Some(value.to_string()))], self.timeout)
            .await?;

        let packages = if payload.is_array() {
            let records: Vec<PackageRecord> = decode(payload, "lookup")?;
            if records.is_empty() {
                return Err(LookupError::PackageNotFound(value.to_string()));
            }
            Resolved::Many(records)
        } else {
            Resolved::One(decode(payload, "lookup")?)
        };

        Ok(LookupResult::api(packages))
    }

    async fn resolve_identity(&self, ecosystem: &str, name: &str) -> Result<Identity, LookupError> {
        if let Some(package) = self.local.find_package(ecosystem, name).await? {
            debug!(ecosystem, name, "package found locally");
            return Ok(Identity::Local(package));
        }

        let path = package_path(ecosystem, name)?;
        let payload = self.api.get(&path, &[], self.timeout).await?;
        Ok(Identity::Remote(PackagePayload::from_value(payload)?))
    }

    // ==================== Package Details ====================

    /// Versions of a package, newest first.
    pub async fn get_versions(
        &self,
        ecosystem: &str,
        name: &str,
    ) -> Result<Sourced<Vec<VersionRecord>>, LookupError> {
        if let Some(package) = self.local.find_package(ecosystem, name).await? {
            return Ok(Sourced::local(self.local.versions(&package).await?));
        }

        let path = format!("{}/versions", package_path(ecosystem, name)?);
        let payload = self.api.get(&path, &[], self.timeout).await?;
        let mut versions: Vec<VersionRecord> = decode(payload, "versions")?;
        sort_newest_first(&mut versions);

        Ok(Sourced::api(versions))
    }

    /// Security advisories. Remotely these come embedded in the package.
    pub async fn get_advisories(
        &self,
        ecosystem: &str,
        name: &str,
    ) -> Result<Sourced<Vec<AdvisoryRecord>>, LookupError> {
        Ok(match self.resolve_identity(ecosystem, name).await? {
            Identity::Local(package) => Sourced::local(self.local.advisories(&package).await?),
            Identity::Remote(payload) => Sourced::api(payload.advisories),
        })
    }

    /// Source repository metadata and URL.
    pub async fn get_repository(
        &self,
        ecosystem: &str,
        name: &str,
    ) -> Result<Sourced<RepositoryInfo>, LookupError> {
        Ok(match self.resolve_identity(ecosystem, name).await? {
            Identity::Local(package) => Sourced::local(RepositoryInfo {
                metadata: self.local.repo_metadata(&package).await?,
                repository_url: package.record.repository_url,
            }),
            Identity::Remote(payload) => Sourced::api(RepositoryInfo {
                metadata: payload.repo_metadata,
                repository_url: payload.package.repository_url,
            }),
        })
    }

    /// Packages that depend on this one.
    ///
    /// The snapshot holds no reverse dependencies, so this always asks the
    /// API.
    pub async fn get_dependents(
        &self,
        ecosystem: &str,
        name: &str,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Sourced<Vec<PackageRecord>>, LookupError> {
        let path = format!("{}/dependent_packages", package_path(ecosystem, name)?);
        let params = [
            ("page", page.map(|p| p.to_string())),
            ("per_page", per_page.map(|p| p.clamp(1, MAX_PER_PAGE).to_string())),
        ];
        let payload = self.api.get(&path, &params, self.timeout).await?;

        Ok(Sourced::api(decode(payload, "dependents")?))
    }

    // ==================== Search & Diagnostics ====================

    /// Full-text search over the snapshot.
    pub async fn search(&self, query: &str, limit: u32) -> Result<SearchOutcome, LookupError> {
        Ok(match self.local.search(query, limit).await? {
            Some(hits) => SearchOutcome::Results(hits),
            None => SearchOutcome::NoDatabase,
        })
    }

    /// All registries known to the API, largest first.
    ///
    /// Registries the API lists without an ecosystem get the one the mapping
    /// table assigns to their host, when there is one.
    pub async fn list_registries(&self) -> Result<Vec<RegistrySummary>, LookupError> {
        let payload = self.api.get("/registries", &[], self.timeout).await?;
        let mut registries: Vec<RegistrySummary> = decode(payload, "registries")?;
        for registry in registries.iter_mut().filter(|r| r.ecosystem.is_empty()) {
            if let Some(ecosystem) = registry_to_ecosystem(&registry.name) {
                registry.ecosystem = ecosystem.to_string();
            }
        }
        registries.sort_by(|a, b| b.packages_count.cmp(&a.packages_count));
        Ok(registries)
    }

    pub async fn database_info(&self) -> Result<Option<DatabaseInfo>, LookupError> {
        self.local.database_info().await
    }

    /// Probe the snapshot and the API.
    pub async fn health(&self) -> HealthReport {
        let database = match self.local.package_count().await {
            Ok(Some(packages)) => DatabaseHealth::Ok { packages },
            Ok(None) => DatabaseHealth::NotLoaded,
            Err(e) => DatabaseHealth::Error(e.to_string()),
        };

        let start = Instant::now();
        let api = match self.api.get(HEALTH_PROBE_PATH, &[], HEALTH_TIMEOUT).await {
            Ok(_) => ApiHealth::Ok {
                latency: start.elapsed(),
            },
            Err(e) => ApiHealth::Error(e.to_string()),
        };

        HealthReport { database, api }
    }
}

/// Registry-scoped API path for a package.
fn package_path(ecosystem: &str, name: &str) -> Result<String, LookupError> {
    let registry = ecosystem_to_registry(ecosystem)
        .ok_or_else(|| LookupError::InvalidEcosystem(ecosystem.to_string()))?;

    Ok(format!(
        "/registries/{}/packages/{}",
        registry,
        encode_component(name)
    ))
}
