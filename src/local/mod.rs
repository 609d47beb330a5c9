//! Local snapshot store.
//!
//! The snapshot is a read-only SQLite file named `critical-packages.db`,
//! looked up in order at:
//! - an explicit path (`--db`, `ECOSYSTEMS_DB_PATH`, or the config file)
//! - the current directory
//! - `~/.ecosystems/`
//!
//! When none exists every local query is a plain miss and lookups go to the
//! API.

mod config;
mod db;
#[cfg(test)]
pub(crate) mod fixture;
pub mod models;

pub use config::LocalConfig;
pub use db::SnapshotDb;
pub use models::{DatabaseInfo, LocalPackage};

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::types::{AdvisoryRecord, LookupError, RepoMetadata, SearchHit, VersionRecord};

/// The snapshot file name.
pub const DB_FILE_NAME: &str = "critical-packages.db";

/// Directory under the home directory holding the snapshot.
pub const HOME_DIR_NAME: &str = ".ecosystems";

/// Candidate snapshot paths, in the order they are tried.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(DB_FILE_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(HOME_DIR_NAME).join(DB_FILE_NAME));
    }
    paths
}

/// Handle on the snapshot, or on its absence.
///
/// Point lookups answer `None` both for a miss and when no snapshot is
/// loaded. Search and diagnostics answer `None` only when no snapshot is
/// loaded, so callers can tell "nothing matched" from "nothing to search".
pub struct LocalStore {
    db: Option<SnapshotDb>,
}

impl LocalStore {
    pub fn new(db: SnapshotDb) -> Self {
        Self { db: Some(db) }
    }

    pub fn absent() -> Self {
        Self { db: None }
    }

    /// Open the first candidate that exists and opens cleanly.
    pub async fn discover(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            match SnapshotDb::open(path).await {
                Ok(db) => {
                    info!(path = %path.display(), "using local database");
                    return Self::new(db);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "failed to open local database"),
            }
        }

        info!("no local database found, using API only");
        Self::absent()
    }

    pub fn is_loaded(&self) -> bool {
        self.db.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.db.as_ref().map(SnapshotDb::path)
    }

    pub async fn find_package(
        &self,
        ecosystem: &str,
        name: &str,
    ) -> Result<Option<LocalPackage>, LookupError> {
        match &self.db {
            Some(db) => db.find_package(ecosystem, name).await,
            None => Ok(None),
        }
    }

    pub async fn find_package_by_purl(&self, purl: &str) -> Result<Option<LocalPackage>, LookupError> {
        match &self.db {
            Some(db) => db.find_package_by_purl(purl).await,
            None => Ok(None),
        }
    }

    pub async fn versions(&self, package: &LocalPackage) -> Result<Vec<VersionRecord>, LookupError> {
        match &self.db {
            Some(db) => db.versions(package.id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn advisories(&self, package: &LocalPackage) -> Result<Vec<AdvisoryRecord>, LookupError> {
        match &self.db {
            Some(db) => db.advisories(package.id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn repo_metadata(&self, package: &LocalPackage) -> Result<Option<RepoMetadata>, LookupError> {
        match &self.db {
            Some(db) => db.repo_metadata(package.id).await,
            None => Ok(None),
        }
    }

    pub async fn search(&self, query: &str, limit: u32) -> Result<Option<Vec<SearchHit>>, LookupError> {
        match &self.db {
            Some(db) => db.search(query, limit).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn database_info(&self) -> Result<Option<DatabaseInfo>, LookupError> {
        let Some(db) = &self.db else {
            return Ok(None);
        };

        let built_at = db.built_at().await?;
        let ecosystems = db.ecosystem_counts().await?;
        let total_packages = ecosystems.iter().map(|e| e.count).sum();

        Ok(Some(DatabaseInfo {
            built_at,
            total_packages,
            ecosystems,
        }))
    }

    pub async fn package_count(&self) -> Result<Option<i64>, LookupError> {
        match &self.db {
            Some(db) => db.package_count().await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let explicit = PathBuf::from("/tmp/explicit.db");
        let paths = candidate_paths(Some(&explicit));
        assert_eq!(paths[0], explicit);
        assert!(paths.iter().skip(1).all(|p| p.ends_with(DB_FILE_NAME)));
        assert!(candidate_paths(None).iter().all(|p| *p != explicit));
    }

    #[tokio::test]
    async fn test_discover_none_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::discover(&[
            dir.path().join("missing.db"),
            dir.path().join("also-missing.db"),
        ])
        .await;
        assert!(!store.is_loaded());
        assert!(store.find_package("npm", "lodash").await.unwrap().is_none());
        assert!(store.search("lodash", 10).await.unwrap().is_none());
        assert!(store.database_info().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_discover_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DB_FILE_NAME);
        fixture::create(&path).await;

        let store = LocalStore::discover(&[dir.path().join("missing.db"), path.clone()]).await;
        assert!(store.is_loaded());
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(store.find_package("npm", "lodash").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_discover_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::discover(&[dir.path().to_path_buf()]).await;
        assert!(!store.is_loaded());
    }

    #[tokio::test]
    async fn test_database_info() {
        let (_dir, db) = fixture::snapshot().await;
        let store = LocalStore::new(db);

        let info = store.database_info().await.unwrap().unwrap();
        assert_eq!(info.total_packages, 4);
        assert_eq!(info.built_at.as_deref(), Some("2025-01-15T00:00:00Z"));
        assert_eq!(info.ecosystems[0].ecosystem, "npm");
        assert_eq!(store.package_count().await.unwrap(), Some(4));
    }
}
