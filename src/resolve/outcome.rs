//! What a lookup hands back.

use std::time::Duration;

use serde::Serialize;

use crate::types::{PackageRecord, SearchHit, Source};

/// One package, or the list the API returns for cross-registry lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    One(PackageRecord),
    Many(Vec<PackageRecord>),
}

impl Resolved {
    pub fn records(&self) -> &[PackageRecord] {
        match self {
            Resolved::One(record) => std::slice::from_ref(record),
            Resolved::Many(records) => records,
        }
    }
}

/// The outcome of a package lookup, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    pub source: Source,
    pub packages: Resolved,
}

impl LookupResult {
    pub fn local(record: PackageRecord) -> Self {
        Self {
            source: Source::Local,
            packages: Resolved::One(record),
        }
    }

    pub fn api(packages: Resolved) -> Self {
        Self {
            source: Source::Api,
            packages,
        }
    }
}

/// Local full-text search has no remote fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SearchOutcome {
    NoDatabase,
    Results(Vec<SearchHit>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseHealth {
    NotLoaded,
    Ok { packages: i64 },
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiHealth {
    Ok { latency: Duration },
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub database: DatabaseHealth,
    pub api: ApiHealth,
}

impl HealthReport {
    /// A missing database is a degraded-but-valid mode, not a failure.
    pub fn healthy(&self) -> bool {
        !matches!(self.database, DatabaseHealth::Error(_)) && matches!(self.api, ApiHealth::Ok { .. })
    }
}
