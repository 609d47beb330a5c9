//! Plain-text rendering shared by the MCP tools and the CLI.

use crate::local::DatabaseInfo;
use crate::resolve::{ApiHealth, DatabaseHealth, HealthReport, LookupResult, SearchOutcome};
use crate::types::{
    AdvisoryRecord, PackageRecord, RegistrySummary, RepositoryInfo, SearchHit, Sourced,
    VersionRecord,
};

const ADVISORY_LIMIT: usize = 10;
const VERSION_LIMIT: usize = 10;
const SEARCH_LIMIT: usize = 20;
const REGISTRY_LIMIT: usize = 30;
const DESCRIPTION_WIDTH: usize = 80;

pub const NO_DATABASE_SEARCH: &str = "Search requires local database. No database loaded.";
pub const NO_DATABASE_INFO: &str = "No local database loaded. Using API fallback for all queries.";

/// Abbreviate a count: `1.5K`, `2.0M`, `3.1B`.
pub fn format_number(n: Option<i64>) -> String {
    let n = n.unwrap_or(0);
    match n {
        0 => "0".to_string(),
        n if n >= 1_000_000_000 => format!("{:.1}B", n as f64 / 1e9),
        n if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1e6),
        n if n >= 1_000 => format!("{:.1}K", n as f64 / 1e3),
        n => n.to_string(),
    }
}

pub fn package(pkg: &PackageRecord) -> String {
    let mut lines = vec![format!("{}/{}", pkg.ecosystem, pkg.name)];

    if let Some(description) = non_empty(&pkg.description) {
        lines.push(format!("  {}", description));
    }
    lines.push(format!("  License: {}", non_empty(&pkg.licenses).unwrap_or("Unknown")));
    lines.push(format!("  Latest: {}", non_empty(&pkg.latest_version).unwrap_or("Unknown")));
    lines.push(format!("  Downloads: {}", format_number(pkg.downloads)));
    if let Some(count) = pkg.dependent_packages_count.filter(|c| *c != 0) {
        lines.push(format!("  Dependents: {} packages", format_number(Some(count))));
    }
    if let Some(url) = non_empty(&pkg.repository_url) {
        lines.push(format!("  Repository: {}", url));
    }
    if let Some(homepage) = non_empty(&pkg.homepage) {
        lines.push(format!("  Homepage: {}", homepage));
    }

    lines.join("\n")
}

/// One package, or several separated by rules.
pub fn lookup(result: &LookupResult) -> String {
    result
        .packages
        .records()
        .iter()
        .map(package)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

pub fn advisories(advisories: &[AdvisoryRecord]) -> String {
    if advisories.is_empty() {
        return "No known security advisories.".to_string();
    }

    let mut blocks: Vec<String> = advisories
        .iter()
        .take(ADVISORY_LIMIT)
        .map(|a| {
            let mut parts = vec![format!(
                "[{}] {}",
                a.severity.as_deref().unwrap_or("UNKNOWN"),
                a.title.as_deref().unwrap_or("Untitled")
            )];
            if !a.affected.is_empty() {
                parts.push(format!("  Affected: {}", a.affected.join(" OR ")));
            }
            if !a.fixed.is_empty() {
                parts.push(format!("  Fixed in: {}", a.fixed.join(", ")));
            }
            parts.push(format!("  {}", non_empty(&a.url).unwrap_or(&a.uuid)));
            parts.join("\n")
        })
        .collect();

    if advisories.len() > ADVISORY_LIMIT {
        blocks.push(format!("... and {} more advisories", advisories.len() - ADVISORY_LIMIT));
    }

    blocks.join("\n\n")
}

pub fn advisories_report(ecosystem: &str, name: &str, list: &[AdvisoryRecord]) -> String {
    format!(
        "Security advisories for {}/{}: {} found\n\n{}",
        ecosystem,
        name,
        list.len(),
        advisories(list)
    )
}

pub fn repository(info: &RepositoryInfo) -> String {
    let Some(repo) = &info.metadata else {
        return match non_empty(&info.repository_url) {
            Some(url) => format!("Repository: {}", url),
            None => "No repository metadata available.".to_string(),
        };
    };

    let mut lines = Vec::new();
    if let Some(full_name) = non_empty(&repo.full_name) {
        lines.push(full_name.to_string());
    }
    if let Some(host) = non_empty(&repo.host) {
        lines.push(format!("  Host: {}", host));
    }
    if let Some(language) = non_empty(&repo.language) {
        lines.push(format!("  Language: {}", language));
    }
    if let Some(stars) = repo.stars.filter(|n| *n != 0) {
        lines.push(format!("  Stars: {}", format_number(Some(stars))));
    }
    if let Some(forks) = repo.forks.filter(|n| *n != 0) {
        lines.push(format!("  Forks: {}", format_number(Some(forks))));
    }
    if let Some(issues) = repo.open_issues.filter(|n| *n != 0) {
        lines.push(format!("  Open Issues: {}", issues));
    }
    if repo.archived {
        lines.push("  Status: Archived".to_string());
    }
    if repo.fork {
        lines.push("  (Fork)".to_string());
    }

    lines.join("\n")
}

pub fn repository_report(ecosystem: &str, name: &str, info: &RepositoryInfo) -> String {
    format!("Repository for {}/{}:\n{}", ecosystem, name, repository(info))
}

pub fn versions(versions: &[VersionRecord]) -> String {
    if versions.is_empty() {
        return "No versions found.".to_string();
    }

    let mut lines: Vec<String> = versions
        .iter()
        .take(VERSION_LIMIT)
        .map(|v| {
            let date = match non_empty(&v.published_at) {
                Some(published) => published.split('T').next().unwrap_or(published),
                None => "unknown date",
            };
            format!("  {} ({})", v.number, date)
        })
        .collect();

    if versions.len() > VERSION_LIMIT {
        lines.push(format!("  ... and {} more versions", versions.len() - VERSION_LIMIT));
    }

    lines.join("\n")
}

pub fn versions_report(ecosystem: &str, name: &str, list: &[VersionRecord]) -> String {
    format!("Versions for {}/{}:\n{}", ecosystem, name, versions(list))
}

/// Dependents are handed back as pretty-printed JSON.
pub fn dependents(result: &Sourced<Vec<PackageRecord>>) -> String {
    let value = serde_json::json!({
        "source": result.source,
        "dependents": result.value,
    });
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

pub fn search_results(results: &[SearchHit]) -> String {
    if results.is_empty() {
        return "No packages found.".to_string();
    }

    let mut lines: Vec<String> = results
        .iter()
        .take(SEARCH_LIMIT)
        .map(|hit| match non_empty(&hit.description) {
            Some(description) => format!(
                "{}/{} - {}",
                hit.ecosystem,
                hit.name,
                truncate(description, DESCRIPTION_WIDTH)
            ),
            None => format!("{}/{}", hit.ecosystem, hit.name),
        })
        .collect();

    if results.len() > SEARCH_LIMIT {
        lines.push(format!("... and {} more results", results.len() - SEARCH_LIMIT));
    }

    lines.join("\n")
}

pub fn search_report(query: &str, outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::NoDatabase => NO_DATABASE_SEARCH.to_string(),
        SearchOutcome::Results(hits) => {
            format!("Search results for \"{}\":\n\n{}", query, search_results(hits))
        }
    }
}

/// Registries are expected largest first.
pub fn registries(registries: &[RegistrySummary]) -> String {
    let mut lines: Vec<String> = registries
        .iter()
        .take(REGISTRY_LIMIT)
        .map(|r| {
            format!(
                "{}: {} ({} packages)",
                r.ecosystem,
                r.name,
                format_number(Some(r.packages_count))
            )
        })
        .collect();

    if registries.len() > REGISTRY_LIMIT {
        lines.push(format!("... and {} more registries", registries.len() - REGISTRY_LIMIT));
    }

    format!("Available registries:\n\n{}", lines.join("\n"))
}

pub fn database_info(info: Option<&DatabaseInfo>) -> String {
    let Some(info) = info else {
        return NO_DATABASE_INFO.to_string();
    };

    let ecosystems = info
        .ecosystems
        .iter()
        .map(|e| format!("  {}: {}", e.ecosystem, e.count))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Local database loaded:\n  Total packages: {}\n  Built: {}\n\nPackages by ecosystem:\n{}",
        info.total_packages,
        info.built_at.as_deref().unwrap_or("unknown"),
        ecosystems
    )
}

pub fn health(report: &HealthReport) -> String {
    let database = match &report.database {
        DatabaseHealth::Ok { packages } => format!("Database: OK ({} packages)", packages),
        DatabaseHealth::NotLoaded => "Database: NOT LOADED (using API fallback)".to_string(),
        DatabaseHealth::Error(e) => format!("Database: ERROR - {}", e),
    };
    let api = match &report.api {
        ApiHealth::Ok { latency } => format!("API: OK ({}ms)", latency.as_millis()),
        ApiHealth::Error(e) => format!("API: ERROR - {}", e),
    };

    format!(
        "Status: {}\nVersion: {}\n\n{}\n{}",
        if report.healthy() { "HEALTHY" } else { "DEGRADED" },
        env!("CARGO_PKG_VERSION"),
        database,
        api
    )
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// First `width` characters, on a char boundary.
fn truncate(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
