//! Bounded-time JSON GET requests against the API.

use std::future::Future;
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::types::LookupError;

pub const API_BASE: &str = "https://packages.ecosyste.ms/api/v1";
pub const USER_AGENT: &str = concat!("ecosystems-mcp/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const HEALTH_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value for use as a single path segment.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Something that can GET a JSON document from the API.
///
/// [`ApiClient`] is the real implementation; tests substitute fakes.
pub trait Fetch: Send + Sync {
    /// GET `path` relative to the API base.
    ///
    /// Parameters whose value is `None` or empty are left out of the query
    /// string. The call fails with [`LookupError::ApiTimeout`] if the response
    /// has not been fully read within `timeout`.
    fn get(
        &self,
        path: &str,
        params: &[(&str, Option<String>)],
        timeout: Duration,
    ) -> impl Future<Output = Result<Value, LookupError>> + Send;
}

/// reqwest-backed API client.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn with_base_url(base_url: String) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LookupError::internal(format!("failed to build http client: {e}"), None))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL and append the non-empty parameters.
    pub fn build_url(
        &self,
        path: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<Url, LookupError> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|e| LookupError::internal(format!("invalid request URL: {e}"), Some(raw.clone())))?;

        let present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (*key, v))
            })
            .collect();

        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }

        Ok(url)
    }

    async fn send(&self, url: Url, url_str: &str) -> Result<Value, LookupError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(e, url_str))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                url: url_str.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, url_str))?;

        serde_json::from_slice(&body).map_err(|e| {
            LookupError::internal(
                format!("API returned invalid JSON: {e}"),
                Some(url_str.to_string()),
            )
        })
    }
}

impl Fetch for ApiClient {
    async fn get(
        &self,
        path: &str,
        params: &[(&str, Option<String>)],
        timeout: Duration,
    ) -> Result<Value, LookupError> {
        let url = self.build_url(path, params)?;
        let url_str = url.to_string();
        let timeout_ms = timeout.as_millis() as u64;
        debug!(url = %url_str, timeout_ms, "fetching from API");

        // Dropping the request future on expiry cancels the in-flight request.
        let outcome = tokio::time::timeout(timeout, self.send(url, &url_str)).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                debug!(url = %url_str, timeout_ms, "API request timed out");
                Err(LookupError::ApiTimeout {
                    url: url_str,
                    timeout_ms,
                })
            }
        }
    }
}

fn transport_error(err: reqwest::Error, url: &str) -> LookupError {
    if err.is_decode() {
        LookupError::internal(format!("failed to read API response: {err}"), Some(url.to_string()))
    } else {
        LookupError::ApiUnavailable {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::types::ErrorCode;

    /// Serve one canned HTTP response on a loopback port, returning the base
    /// URL and a handle yielding the raw request text.
    async fn serve_once(
        response: &'static str,
        delay: Duration,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}/api/v1", addr), handle)
    }

    fn client(base: String) -> ApiClient {
        ApiClient::with_base_url(base).unwrap()
    }

    #[test]
    fn test_build_url_omits_empty_params() {
        let api = client(API_BASE.to_string());
        let url = api
            .build_url(
                "/registries/npmjs.org/packages/lodash/dependent_packages",
                &[
                    ("page", Some("2".to_string())),
                    ("per_page", None),
                    ("empty", Some(String::new())),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://packages.ecosyste.ms/api/v1/registries/npmjs.org/packages/lodash/dependent_packages?page=2"
        );

        let bare = api.build_url("registries", &[("per_page", None)]).unwrap();
        assert_eq!(bare.as_str(), "https://packages.ecosyste.ms/api/v1/registries");
    }

    #[test]
    fn test_build_url_encodes_query_values() {
        let api = client(API_BASE.to_string());
        let url = api
            .build_url(
                "packages/lookup",
                &[("repository_url", Some("https://github.com/lodash/lodash".to_string()))],
            )
            .unwrap();
        assert_eq!(
            url.query(),
            Some("repository_url=https%3A%2F%2Fgithub.com%2Flodash%2Flodash")
        );
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("lodash"), "lodash");
        assert_eq!(encode_component("@babel/core"), "%40babel%2Fcore");
        assert_eq!(encode_component("%40babel/core"), "%2540babel%2Fcore");
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("it's-(ok)_~.*!"), "it's-(ok)_~.*!");
    }

    #[tokio::test]
    async fn test_success_returns_json_and_sends_headers() {
        let (base, handle) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 17\r\nConnection: close\r\n\r\n{\"name\":\"lodash\"}",
            Duration::ZERO,
        )
        .await;

        let value = client(base)
            .get("/registries/npmjs.org/packages/lodash", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(value["name"], "lodash");

        let request = handle.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/v1/registries/npmjs.org/packages/lodash http/1.1"));
        assert!(request.contains("accept: application/json"));
        assert!(request.contains(&format!("user-agent: {}", USER_AGENT.to_lowercase())));
    }

    #[tokio::test]
    async fn test_503_is_retryable_api_error() {
        let (base, _handle) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;

        let err = client(base)
            .get("registries", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiError);
        assert!(err.retryable());
        assert_eq!(err.to_string(), "API error: 503 Service Unavailable");
        assert!(err.details().unwrap().ends_with("/api/v1/registries"));
    }

    #[tokio::test]
    async fn test_404_is_not_retryable() {
        let (base, _handle) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;

        let err = client(base)
            .get("registries/npmjs.org/packages/nope", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Api { status: 404, .. }));
        assert!(!err.retryable());
    }

    #[tokio::test]
    async fn test_timeout_reports_bound() {
        let (base, _handle) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
            Duration::from_secs(5),
        )
        .await;

        let err = client(base)
            .get("registries", &[], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiTimeout);
        assert!(err.retryable());
        assert!(err.to_string().contains("100ms"));
        assert!(err.details().unwrap().contains("/api/v1/registries"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_internal_error() {
        let (base, _handle) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot json!",
            Duration::ZERO,
        )
        .await;

        let err = client(base)
            .get("registries", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.retryable());
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}/api/v1", addr))
            .get("registries", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiUnavailable);
        assert!(err.retryable());
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_registry_lookup() {
        let api = ApiClient::with_base_url(API_BASE.to_string()).unwrap();
        let value = api
            .get("/registries/npmjs.org/packages/lodash", &[], DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(value["name"], "lodash");
    }
}
