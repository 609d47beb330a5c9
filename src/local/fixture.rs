//! Snapshot fixtures shared by the local store and resolver tests.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, SqlitePool};
use tempfile::TempDir;

use super::db::SnapshotDb;

const SCHEMA: &str = r#"
CREATE TABLE packages (
    id INTEGER PRIMARY KEY,
    ecosystem TEXT NOT NULL,
    name TEXT NOT NULL,
    purl TEXT,
    namespace TEXT,
    description TEXT,
    homepage TEXT,
    repository_url TEXT,
    licenses TEXT,
    normalized_licenses TEXT,
    latest_version TEXT,
    versions_count INTEGER,
    downloads INTEGER,
    downloads_period TEXT,
    dependent_packages_count INTEGER,
    dependent_repos_count INTEGER,
    first_release_at TEXT,
    latest_release_at TEXT
);
CREATE UNIQUE INDEX idx_packages_ecosystem_name ON packages(ecosystem, name);
CREATE INDEX idx_packages_purl ON packages(purl);

CREATE TABLE versions (
    id INTEGER PRIMARY KEY,
    package_id INTEGER NOT NULL REFERENCES packages(id),
    number TEXT NOT NULL,
    purl TEXT,
    licenses TEXT,
    integrity TEXT,
    published_at TEXT,
    download_url TEXT
);

CREATE TABLE advisories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    package_id INTEGER NOT NULL REFERENCES packages(id),
    uuid TEXT NOT NULL,
    url TEXT,
    title TEXT,
    description TEXT,
    severity TEXT,
    cvss_score REAL,
    published_at TEXT
);

CREATE TABLE repo_metadata (
    package_id INTEGER PRIMARY KEY REFERENCES packages(id),
    owner TEXT,
    repo_name TEXT,
    full_name TEXT,
    host TEXT,
    language TEXT,
    stargazers_count INTEGER,
    forks_count INTEGER,
    open_issues_count INTEGER,
    archived INTEGER,
    fork INTEGER
);

CREATE TABLE build_info (
    id INTEGER PRIMARY KEY,
    built_at TEXT
);

CREATE VIRTUAL TABLE packages_fts USING fts5(
    name, description, content='packages', content_rowid='id'
);
"#;

const DATA: &str = r#"
INSERT INTO packages (id, ecosystem, name, purl, description, licenses, normalized_licenses,
    repository_url, latest_version, downloads, dependent_packages_count)
VALUES
    (1, 'npm', 'lodash', 'pkg:npm/lodash', 'Lodash modular utilities library', 'MIT', '["MIT"]',
        'https://github.com/lodash/lodash', '4.17.21', 1000000, 150000),
    (2, 'npm', 'better-sqlite3', 'pkg:npm/better-sqlite3',
        'The fastest and simplest library for SQLite3 in Node.js: better-sqlite3', 'MIT', 'MIT',
        'https://github.com/WiseLibs/better-sqlite3', '11.0.0', 2000000, 3000),
    (3, 'pypi', 'requests', NULL, 'Python HTTP for Humans.', 'Apache-2.0', NULL,
        'https://github.com/psf/requests', '2.32.3', 500000000, 60000),
    (4, 'cargo', 'serde', 'pkg:cargo/serde', 'A generic serialization/deserialization framework',
        'MIT OR Apache-2.0', 'MIT, Apache-2.0', 'https://github.com/serde-rs/serde', '1.0.210',
        400000000, 40000);

INSERT INTO packages_fts (rowid, name, description) SELECT id, name, description FROM packages;

INSERT INTO versions (package_id, number, published_at) VALUES
    (1, '4.17.21', '2021-02-20'),
    (3, '2.31.0', '2023-05-22T14:00:00Z'),
    (3, '2.0.0', '2013-09-24T19:00:00Z'),
    (3, '2.32.3', '2024-05-29T15:00:00Z');

INSERT INTO advisories (package_id, uuid, title, severity, cvss_score)
VALUES (1, 'GHSA-xxxx-xxxx-xxxx', 'Prototype Pollution', 'HIGH', 7.5);

INSERT INTO repo_metadata (package_id, owner, full_name, host, language, stargazers_count,
    forks_count, open_issues_count, archived, fork)
VALUES (1, 'lodash', 'lodash/lodash', 'GitHub', 'JavaScript', 50000, 5000, 12, 0, 0);

INSERT INTO build_info (id, built_at) VALUES (1, '2025-01-15T00:00:00Z');
"#;

async fn writable(path: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap()
}

/// Write the fixture snapshot to `path`.
pub async fn create(path: &Path) {
    let pool = writable(path).await;
    pool.execute(SCHEMA).await.unwrap();
    pool.execute(DATA).await.unwrap();
    pool.close().await;
}

/// Write a valid SQLite file that lacks the snapshot schema.
pub async fn create_empty(path: &Path) {
    let pool = writable(path).await;
    pool.execute("CREATE TABLE unrelated (x INTEGER)").await.unwrap();
    pool.close().await;
}

/// Build the fixture in a temp dir and open it read-only.
pub async fn snapshot() -> (TempDir, SnapshotDb) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("critical-packages.db");
    create(&path).await;
    let db = SnapshotDb::open(&path).await.unwrap();
    (dir, db)
}
