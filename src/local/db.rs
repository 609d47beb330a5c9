//! Read-only access to the snapshot SQLite database.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::models::{AdvisoryRow, EcosystemCount, LocalPackage, PackageRow, RepoRow};
use crate::types::{AdvisoryRecord, LookupError, RepoMetadata, SearchHit, VersionRecord};

const PACKAGE_COLUMNS: &str = "id, ecosystem, name, purl, namespace, description, homepage, \
    repository_url, licenses, normalized_licenses, latest_version, versions_count, downloads, \
    downloads_period, dependent_packages_count, dependent_repos_count, first_release_at, \
    latest_release_at";

/// The snapshot database, opened read-only.
///
/// The pool is safe to share between concurrent lookups: nothing ever
/// writes to it, and SQLite rejects any attempt to.
pub struct SnapshotDb {
    pool: SqlitePool,
    path: PathBuf,
}

impl SnapshotDb {
    /// Open an existing snapshot. Never creates a file.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open {}", db_path.display()))?;

        Ok(Self {
            pool,
            path: db_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ==================== Package Operations ====================

    /// Find a package by exact ecosystem and name.
    pub async fn find_package(
        &self,
        ecosystem: &str,
        name: &str,
    ) -> Result<Option<LocalPackage>, LookupError> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE ecosystem = ? AND name = ?"
        ))
        .bind(ecosystem)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LocalPackage::from))
    }

    /// Find a package by exact purl.
    pub async fn find_package_by_purl(&self, purl: &str) -> Result<Option<LocalPackage>, LookupError> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE purl = ?"
        ))
        .bind(purl)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LocalPackage::from))
    }

    // ==================== Child Operations ====================

    /// Versions of a package, newest first.
    pub async fn versions(&self, package_id: i64) -> Result<Vec<VersionRecord>, LookupError> {
        let rows = sqlx::query_as::<_, VersionRecord>(
            r#"
            SELECT number, purl, licenses, integrity, published_at, download_url
            FROM versions
            WHERE package_id = ?
            ORDER BY published_at DESC
            "#,
        )
        .bind(package_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn advisories(&self, package_id: i64) -> Result<Vec<AdvisoryRecord>, LookupError> {
        let rows = sqlx::query_as::<_, AdvisoryRow>(
            r#"
            SELECT uuid, url, title, description, severity, cvss_score, published_at
            FROM advisories
            WHERE package_id = ?
            "#,
        )
        .bind(package_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AdvisoryRecord::from).collect())
    }

    pub async fn repo_metadata(&self, package_id: i64) -> Result<Option<RepoMetadata>, LookupError> {
        let row = sqlx::query_as::<_, RepoRow>(
            r#"
            SELECT owner, repo_name, full_name, host, language,
                stargazers_count, forks_count, open_issues_count, archived, fork
            FROM repo_metadata
            WHERE package_id = ?
            "#,
        )
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RepoMetadata::from))
    }

    // ==================== Search ====================

    /// Full-text search over package names and descriptions.
    ///
    /// The query is matched as a literal phrase, so `better-sqlite3` is not
    /// read as `better NOT sqlite3`.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, LookupError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, SearchHit>(
            r#"
            SELECT p.ecosystem, p.name, p.description, p.licenses, p.downloads,
                p.dependent_packages_count, p.repository_url
            FROM packages p
            JOIN packages_fts ON p.id = packages_fts.rowid
            WHERE packages_fts MATCH ?
            LIMIT ?
            "#,
        )
        .bind(fts_phrase(query))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ==================== Diagnostics ====================

    /// Snapshot build time from the `build_info` singleton row.
    pub async fn built_at(&self) -> Result<Option<String>, LookupError> {
        let built_at: Option<Option<String>> =
            sqlx::query_scalar("SELECT built_at FROM build_info WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(built_at.flatten())
    }

    /// Package counts per ecosystem, largest first.
    pub async fn ecosystem_counts(&self) -> Result<Vec<EcosystemCount>, LookupError> {
        let rows = sqlx::query_as::<_, EcosystemCount>(
            "SELECT ecosystem, COUNT(*) AS count FROM packages GROUP BY ecosystem ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn package_count(&self) -> Result<i64, LookupError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM packages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Quote a user query as an FTS5 phrase, doubling embedded quotes.
pub fn fts_phrase(query: &str) -> String {
    format!("\"{}\"", query.replace('"', "\"\""))
}
