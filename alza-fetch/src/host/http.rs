//! HTTP client with tracing, browser headers, and a domain allowlist.
//!
//! Every call returns an [`ApiResponse`] only for statuses below 400.
//! Anything else is classified into [`FetchError::AuthRequired`] (401/403)
//! or [`FetchError::Http`], with the body cut down to a snippet.

use alza_core::extract::{SNIPPET_LIMIT, snippet};
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;
use crate::host::headers::browser_headers;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shop base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.alza.sk";

/// Domains the default client may talk to.
const DEFAULT_ALLOWED_DOMAINS: [&str; 2] = ["alza.sk", "alza.cz"];

// ============================================================================
// Response
// ============================================================================

/// A successful (status < 400) response, fully read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Status code.
    pub status: u16,
    /// Final request URL.
    pub url: String,
    /// `Content-Type` header value, empty when absent.
    pub content_type: String,
    /// Response body.
    pub body: String,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_str(&self.body).map_err(|source| FetchError::Parse {
            url: self.url.clone(),
            source,
        })
    }

    /// Decodes the body as an untyped JSON document.
    pub fn value(&self) -> Result<serde_json::Value, FetchError> {
        self.json()
    }

    /// Whether the server answered with an HTML page instead of data.
    ///
    /// Happens when a login wall or bot check intercepts the request.
    pub fn looks_like_html(&self) -> bool {
        if self.content_type.to_ascii_lowercase().contains("text/html") {
            return true;
        }
        let head = self.body.trim_start().to_ascii_lowercase();
        head.starts_with("<!doctype") || head.starts_with("<html") || head.contains("<html")
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, browser headers, and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    base_url: Url,
    allowed_domains: Option<Vec<String>>,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a client for the live shop.
    pub fn new() -> Result<Self, FetchError> {
        let mut client = Self::with_base_url(DEFAULT_BASE_URL)?;
        client.allowed_domains = Some(
            DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(ToString::to_string)
                .collect(),
        );
        Ok(client)
    }

    /// Creates a client whose relative paths resolve against `base_url`.
    ///
    /// Only the base URL's own host is allowed. Tests point this at a local
    /// mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let host = base
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?
            .to_string();
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        let inner = build_client(&base, timeout)?;

        Ok(Self {
            inner,
            base_url: base,
            allowed_domains: Some(vec![host]),
            timeout,
        })
    }

    /// The base URL relative paths resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `target` (absolute URL or path) and checks it against the allowlist.
    pub fn resolve_url(&self, target: &str) -> Result<Url, FetchError> {
        let url = if target.starts_with("http://") || target.starts_with("https://") {
            Url::parse(target)
        } else {
            self.base_url.join(target)
        }
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        self.is_domain_allowed(&url)?;
        Ok(url)
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), FetchError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let host = url
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::HostNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request, optionally authorized.
    #[instrument(skip(self, auth), fields(url = %target))]
    pub async fn get(&self, target: &str, auth: Option<&str>) -> Result<ApiResponse, FetchError> {
        let url = self.resolve_url(target)?;
        debug!(authorized = auth.is_some(), "GET request");

        let request = with_auth(self.inner.get(url.clone()), auth);
        self.execute(request, &url).await
    }

    /// Performs a GET request carrying browser session cookies.
    #[instrument(skip(self, cookies), fields(url = %target))]
    pub async fn get_with_cookies(
        &self,
        target: &str,
        cookies: &str,
    ) -> Result<ApiResponse, FetchError> {
        let url = self.resolve_url(target)?;
        debug!(cookie_len = cookies.len(), "GET request with cookies");

        let request = self
            .inner
            .get(url.clone())
            .header(header::COOKIE, cookies);
        self.execute(request, &url).await
    }

    /// Performs a POST request with a JSON body.
    #[instrument(skip(self, auth, body), fields(url = %target))]
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        target: &str,
        auth: Option<&str>,
        body: &T,
    ) -> Result<ApiResponse, FetchError> {
        let url = self.resolve_url(target)?;
        debug!(authorized = auth.is_some(), "POST request with JSON");

        let request = with_auth(self.inner.post(url.clone()).json(body), auth);
        self.execute(request, &url).await
    }

    /// Performs a DELETE request.
    #[instrument(skip(self, auth), fields(url = %target))]
    pub async fn delete(
        &self,
        target: &str,
        auth: Option<&str>,
    ) -> Result<ApiResponse, FetchError> {
        let url = self.resolve_url(target)?;
        debug!(authorized = auth.is_some(), "DELETE request");

        let request = with_auth(self.inner.delete(url.clone()), auth);
        self.execute(request, &url).await
    }

    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<ApiResponse, FetchError> {
        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        debug!(status, bytes = body.len(), "Response received");

        if status >= 400 {
            let body = snippet(&body, SNIPPET_LIMIT);
            let url = url.to_string();
            return Err(if status == 401 || status == 403 {
                FetchError::AuthRequired { status, url, body }
            } else {
                FetchError::Http { status, url, body }
            });
        }

        Ok(ApiResponse {
            status,
            url: url.to_string(),
            content_type,
            body,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else {
            FetchError::Request(err)
        }
    }

    /// Returns the inner reqwest client for advanced operations.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

fn build_client(base: &Url, timeout: Duration) -> Result<Client, FetchError> {
    let origin = base.origin().ascii_serialization();
    Client::builder()
        .timeout(timeout)
        .default_headers(browser_headers(&origin))
        .build()
        .map_err(|e| FetchError::ClientBuild(e.to_string()))
}

fn with_auth(request: RequestBuilder, auth: Option<&str>) -> RequestBuilder {
    match auth {
        Some(token) if !token.is_empty() => request.header(header::AUTHORIZATION, token),
        _ => request,
    }
}

// ============================================================================
// Tests
// ============================================================================
