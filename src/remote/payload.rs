//! Shapes of API responses beyond the plain package record.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{AdvisoryRecord, LookupError, PackageRecord, RepoMetadata, null_as_default};

/// Decode an API response body into `T`.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, LookupError> {
    serde_json::from_value(value)
        .map_err(|e| LookupError::internal(format!("unexpected {what} payload from API"), Some(e.to_string())))
}

/// A registry package lookup, including the fields the API embeds alongside
/// the package itself.
#[derive(Debug, Clone, Default)]
pub struct PackagePayload {
    pub package: PackageRecord,
    pub advisories: Vec<AdvisoryRecord>,
    pub repo_metadata: Option<RepoMetadata>,
}

impl PackagePayload {
    pub fn from_value(value: Value) -> Result<Self, LookupError> {
        let embedded: Embedded = decode(value.clone(), "package")?;
        let package: PackageRecord = decode(value, "package")?;

        Ok(Self {
            package,
            advisories: embedded
                .advisories
                .unwrap_or_default()
                .into_iter()
                .map(AdvisoryRecord::from)
                .collect(),
            repo_metadata: embedded.repo_metadata,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Embedded {
    advisories: Option<Vec<RemoteAdvisory>>,
    repo_metadata: Option<RepoMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemoteAdvisory {
    #[serde(deserialize_with = "null_as_default")]
    uuid: String,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    severity: Option<String>,
    cvss_score: Option<f64>,
    published_at: Option<String>,
    packages: Option<Vec<AdvisoryPackage>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdvisoryPackage {
    versions: Option<Vec<AdvisoryVersion>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdvisoryVersion {
    vulnerable_version_range: Option<String>,
    first_patched_version: Option<String>,
}

impl From<RemoteAdvisory> for AdvisoryRecord {
    fn from(remote: RemoteAdvisory) -> Self {
        // Only the first affected package entry describes the looked-up package.
        let versions = remote
            .packages
            .and_then(|packages| packages.into_iter().next())
            .and_then(|package| package.versions)
            .unwrap_or_default();

        let affected = versions
            .iter()
            .filter_map(|v| v.vulnerable_version_range.clone())
            .filter(|range| !range.is_empty())
            .collect();

        let mut fixed: Vec<String> = Vec::new();
        for version in versions.iter().filter_map(|v| v.first_patched_version.as_ref()) {
            if !version.is_empty() && !fixed.contains(version) {
                fixed.push(version.clone());
            }
        }

        AdvisoryRecord {
            uuid: remote.uuid,
            url: remote.url,
            title: remote.title,
            description: remote.description,
            severity: remote.severity,
            cvss_score: remote.cvss_score,
            published_at: remote.published_at,
            affected,
            fixed,
        }
    }
}
