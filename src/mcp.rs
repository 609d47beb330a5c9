//! MCP server exposing package lookups as tools.

use std::sync::Arc;

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router,
    transport::io::stdio,
};
use serde::Deserialize;
use tracing::info;

use crate::format;
use crate::resolve::{LookupRequest, Resolver};
use crate::types::LookupError;

/// MCP server backed by a shared [`Resolver`].
pub struct PackagesServer {
    resolver: Arc<Resolver>,
    tool_router: ToolRouter<PackagesServer>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PackageInput {
    /// npm, pypi, rubygems, cargo, go, maven, nuget, packagist, hex, pub, etc.
    pub ecosystem: String,
    /// Package name
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupInput {
    /// Package URL, e.g. pkg:npm/lodash, pkg:pypi/requests
    #[serde(default)]
    pub purl: Option<String>,
    /// Package ecosystem
    #[serde(default)]
    pub ecosystem: Option<String>,
    /// Package name
    #[serde(default)]
    pub name: Option<String>,
    /// GitHub/GitLab URL to find associated packages
    #[serde(default)]
    pub repository_url: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DependentsInput {
    /// Package ecosystem
    pub ecosystem: String,
    /// Package name
    pub name: String,
    /// Page number
    #[serde(default)]
    pub page: Option<u32>,
    /// Results per page (max 100)
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchInput {
    /// Keywords to search for
    pub query: String,
    /// Max results (default 20)
    #[serde(default)]
    pub limit: Option<u32>,
}

const DEFAULT_SEARCH_LIMIT: u32 = 20;

impl SearchInput {
    /// Requested limit, with a missing or zero value meaning the default.
    fn limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct EmptyInput {}

/// Text on success, the one-line error report on failure.
fn respond(result: Result<String, LookupError>) -> Result<CallToolResult, McpError> {
    Ok(match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => CallToolResult::error(vec![Content::text(e.report().to_string())]),
    })
}

#[tool_router]
impl PackagesServer {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self {
            resolver,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Get package info: license, latest version, description, downloads, dependencies count. Use when asked about a specific package."
    )]
    async fn get_package(
        &self,
        Parameters(input): Parameters<PackageInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.resolver.get_package(&input.ecosystem, &input.name).await;
        respond(result.map(|r| format::lookup(&r)))
    }

    #[tool(
        description = "Find packages by PURL (pkg:npm/lodash) or GitHub URL. Use when given a package URL or repo link instead of ecosystem+name."
    )]
    async fn lookup_package(
        &self,
        Parameters(input): Parameters<LookupInput>,
    ) -> Result<CallToolResult, McpError> {
        let request = match LookupRequest::from_parts(
            input.purl.as_deref(),
            input.ecosystem.as_deref(),
            input.name.as_deref(),
            input.repository_url.as_deref(),
        ) {
            Ok(request) => request,
            Err(e) => return respond(Err(e)),
        };

        let result = self.resolver.lookup(&request).await;
        respond(result.map(|r| format::lookup(&r)))
    }

    #[tool(
        description = "List package versions with release dates. Use for version history, release timeline, or finding when a version was published."
    )]
    async fn get_package_versions(
        &self,
        Parameters(input): Parameters<PackageInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.resolver.get_versions(&input.ecosystem, &input.name).await;
        respond(result.map(|v| format::versions_report(&input.ecosystem, &input.name, &v.value)))
    }

    #[tool(
        description = "Check security vulnerabilities and CVEs for a package. Use for security audits, vulnerability checks, or when asked if a package is safe."
    )]
    async fn get_package_advisories(
        &self,
        Parameters(input): Parameters<PackageInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.resolver.get_advisories(&input.ecosystem, &input.name).await;
        respond(result.map(|a| format::advisories_report(&input.ecosystem, &input.name, &a.value)))
    }

    #[tool(
        description = "Get GitHub stats: stars, forks, language, open issues. Use when asked about popularity, maintenance, or source repo."
    )]
    async fn get_package_repository(
        &self,
        Parameters(input): Parameters<PackageInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.resolver.get_repository(&input.ecosystem, &input.name).await;
        respond(result.map(|r| format::repository_report(&input.ecosystem, &input.name, &r.value)))
    }

    #[tool(
        description = "List packages that depend on this one (reverse dependencies). Use to gauge adoption or find usage examples."
    )]
    async fn get_package_dependents(
        &self,
        Parameters(input): Parameters<DependentsInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .resolver
            .get_dependents(&input.ecosystem, &input.name, input.page, input.per_page)
            .await;
        respond(result.map(|d| format::dependents(&d)))
    }

    #[tool(
        description = "Find packages by keyword across all ecosystems. Use when looking for packages that do something specific."
    )]
    async fn search_packages(
        &self,
        Parameters(input): Parameters<SearchInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.resolver.search(&input.query, input.limit()).await;
        respond(result.map(|outcome| format::search_report(&input.query, &outcome)))
    }

    #[tool(description = "List supported package registries and ecosystems with package counts.")]
    async fn list_registries(
        &self,
        Parameters(_input): Parameters<EmptyInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.resolver.list_registries().await;
        respond(result.map(|r| format::registries(&r)))
    }

    #[tool(
        description = "Show local database stats: total packages, ecosystems breakdown, build date. Use to verify data availability."
    )]
    async fn get_database_info(
        &self,
        Parameters(_input): Parameters<EmptyInput>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.resolver.database_info().await;
        respond(result.map(|info| format::database_info(info.as_ref())))
    }

    #[tool(
        description = "Check server health: database connectivity, API availability. Use to diagnose connection issues."
    )]
    async fn health_check(
        &self,
        Parameters(_input): Parameters<EmptyInput>,
    ) -> Result<CallToolResult, McpError> {
        let report = self.resolver.health().await;
        respond(Ok(format::health(&report)))
    }
}

#[tool_handler]
impl ServerHandler for PackagesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ecosystems-packages".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Package metadata from ecosyste.ms, served from a local snapshot when one is \
                 loaded and from the live API otherwise. Tools: get_package, lookup_package, \
                 get_package_versions, get_package_advisories, get_package_repository, \
                 get_package_dependents, search_packages, list_registries, get_database_info, \
                 health_check."
                    .to_string(),
            ),
        }
    }
}

/// Run the MCP server over stdio.
pub async fn run(resolver: Resolver) -> Result<()> {
    let local_database = resolver.local().is_loaded();
    let server = PackagesServer::new(Arc::new(resolver));
    let service = server.serve(stdio()).await?;
    info!(local_database, "ecosystems MCP server running on stdio");
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_rendered_as_report() {
        let result = respond(Err(LookupError::InvalidEcosystem("nosuch".into()))).unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_success_is_not_error() {
        let result = respond(Ok("npm/lodash".into())).unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_search_limit_defaults() {
        for args in [
            serde_json::json!({"query": "http"}),
            serde_json::json!({"query": "http", "limit": null}),
            serde_json::json!({"query": "http", "limit": 0}),
        ] {
            let input: SearchInput = serde_json::from_value(args).unwrap();
            assert_eq!(input.limit(), 20);
        }

        let input: SearchInput =
            serde_json::from_value(serde_json::json!({"query": "http", "limit": 5})).unwrap();
        assert_eq!(input.limit(), 5);
    }

    #[test]
    fn test_lookup_input_all_optional() {
        let input: LookupInput = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(input.purl.is_none() && input.repository_url.is_none());
    }
}
