use serde::{Deserialize, Deserializer, Serialize};

/// Where a lookup result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The local snapshot database.
    Local,
    /// The live ecosyste.ms API.
    Api,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Local => "local",
            Source::Api => "api",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub source: Source,
    pub value: T,
}

impl<T> Sourced<T> {
    pub fn local(value: T) -> Self {
        Self {
            source: Source::Local,
            value,
        }
    }

    pub fn api(value: T) -> Self {
        Self {
            source: Source::Api,
            value,
        }
    }
}

/// One package in one ecosystem.
///
/// Local rows and API payloads both end up in this shape, so callers never
/// need to know which source produced a record. Identity is
/// `(ecosystem, name)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub ecosystem: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub purl: Option<String>,
    pub namespace: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository_url: Option<String>,
    pub licenses: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub normalized_licenses: Vec<String>,
    #[serde(alias = "latest_release_number")]
    pub latest_version: Option<String>,
    pub versions_count: Option<i64>,
    pub downloads: Option<i64>,
    pub downloads_period: Option<String>,
    pub dependent_packages_count: Option<i64>,
    pub dependent_repos_count: Option<i64>,
    pub first_release_at: Option<String>,
    pub latest_release_at: Option<String>,
}

/// One published release of a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct VersionRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    pub purl: Option<String>,
    pub licenses: Option<String>,
    pub integrity: Option<String>,
    pub published_at: Option<String>,
    pub download_url: Option<String>,
}

/// Sort newest first. Versions without a publish date go last.
pub fn sort_newest_first(versions: &mut [VersionRecord]) {
    versions.sort_by(|a, b| match (&a.published_at, &b.published_at) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// A security advisory affecting a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdvisoryRecord {
    pub uuid: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub cvss_score: Option<f64>,
    pub published_at: Option<String>,
    /// Vulnerable version ranges, e.g. `< 4.17.21`.
    pub affected: Vec<String>,
    /// First patched versions, de-duplicated.
    pub fixed: Vec<String>,
}

/// Source-repository statistics for a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoMetadata {
    pub owner: Option<String>,
    pub repo_name: Option<String>,
    pub full_name: Option<String>,
    #[serde(deserialize_with = "host_name")]
    pub host: Option<String>,
    pub language: Option<String>,
    #[serde(alias = "stargazers_count")]
    pub stars: Option<i64>,
    #[serde(alias = "forks_count")]
    pub forks: Option<i64>,
    #[serde(alias = "open_issues_count")]
    pub open_issues: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub fork: bool,
}

/// Repository metadata together with the package's declared repository URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositoryInfo {
    pub metadata: Option<RepoMetadata>,
    pub repository_url: Option<String>,
}

/// One registry as listed by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySummary {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ecosystem: String,
    #[serde(deserialize_with = "null_as_default")]
    pub packages_count: i64,
}

/// A full-text search hit from the local snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SearchHit {
    pub ecosystem: String,
    pub name: String,
    pub description: Option<String>,
    pub licenses: Option<String>,
    pub downloads: Option<i64>,
    pub dependent_packages_count: Option<i64>,
    pub repository_url: Option<String>,
}

/// Read an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The API reports `host` either as a plain name or as an object.
fn host_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HostField {
        Name(String),
        Object { name: Option<String> },
    }

    Ok(match Option::<HostField>::deserialize(deserializer)? {
        Some(HostField::Name(name)) => Some(name),
        Some(HostField::Object { name }) => name,
        None => None,
    })
}
