//! Row types for the snapshot database.

use serde::Serialize;
use sqlx::FromRow;

use crate::types::{AdvisoryRecord, PackageRecord, RepoMetadata};

// ============================================================================
// Package Models
// ============================================================================

/// A `packages` row.
#[derive(Debug, Clone, FromRow)]
pub struct PackageRow {
    pub id: i64,
    pub ecosystem: String,
    pub name: String,
    pub purl: Option<String>,
    pub namespace: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository_url: Option<String>,
    pub licenses: Option<String>,
    pub normalized_licenses: Option<String>,
    pub latest_version: Option<String>,
    pub versions_count: Option<i64>,
    pub downloads: Option<i64>,
    pub downloads_period: Option<String>,
    pub dependent_packages_count: Option<i64>,
    pub dependent_repos_count: Option<i64>,
    pub first_release_at: Option<String>,
    pub latest_release_at: Option<String>,
}

/// A package found in the snapshot, with the row id its children hang off.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPackage {
    pub id: i64,
    pub record: PackageRecord,
}

impl From<PackageRow> for LocalPackage {
    fn from(row: PackageRow) -> Self {
        Self {
            id: row.id,
            record: PackageRecord {
                ecosystem: row.ecosystem,
                name: row.name,
                purl: row.purl,
                namespace: row.namespace,
                description: row.description,
                homepage: row.homepage,
                repository_url: row.repository_url,
                licenses: row.licenses,
                normalized_licenses: split_licenses(row.normalized_licenses.as_deref()),
                latest_version: row.latest_version,
                versions_count: row.versions_count,
                downloads: row.downloads,
                downloads_period: row.downloads_period,
                dependent_packages_count: row.dependent_packages_count,
                dependent_repos_count: row.dependent_repos_count,
                first_release_at: row.first_release_at,
                latest_release_at: row.latest_release_at,
            },
        }
    }
}

/// `normalized_licenses` is stored either as a JSON array or comma separated.
fn split_licenses(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    if raw.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
            return list;
        }
    }

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Child Models
// ============================================================================

/// An `advisories` row. The snapshot carries no version ranges.
#[derive(Debug, Clone, FromRow)]
pub struct AdvisoryRow {
    pub uuid: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub cvss_score: Option<f64>,
    pub published_at: Option<String>,
}

impl From<AdvisoryRow> for AdvisoryRecord {
    fn from(row: AdvisoryRow) -> Self {
        AdvisoryRecord {
            uuid: row.uuid,
            url: row.url,
            title: row.title,
            description: row.description,
            severity: row.severity,
            cvss_score: row.cvss_score,
            published_at: row.published_at,
            affected: Vec::new(),
            fixed: Vec::new(),
        }
    }
}

/// A `repo_metadata` row.
#[derive(Debug, Clone, FromRow)]
pub struct RepoRow {
    pub owner: Option<String>,
    pub repo_name: Option<String>,
    pub full_name: Option<String>,
    pub host: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<i64>,
    pub forks_count: Option<i64>,
    pub open_issues_count: Option<i64>,
    pub archived: Option<bool>,
    pub fork: Option<bool>,
}

impl From<RepoRow> for RepoMetadata {
    fn from(row: RepoRow) -> Self {
        RepoMetadata {
            owner: row.owner,
            repo_name: row.repo_name,
            full_name: row.full_name,
            host: row.host,
            language: row.language,
            stars: row.stargazers_count,
            forks: row.forks_count,
            open_issues: row.open_issues_count,
            archived: row.archived.unwrap_or(false),
            fork: row.fork.unwrap_or(false),
        }
    }
}

// ============================================================================
// Diagnostics Models
// ============================================================================

/// Package count for one ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct EcosystemCount {
    pub ecosystem: String,
    pub count: i64,
}

/// Snapshot summary shown by the database info operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseInfo {
    pub built_at: Option<String>,
    pub total_packages: i64,
    pub ecosystems: Vec<EcosystemCount>,
}
