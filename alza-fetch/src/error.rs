//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server rejected the credentials (HTTP 401 or 403).
    #[error("auth required: HTTP {status}{}", body_suffix(.body))]
    AuthRequired {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Truncated response body.
        body: String,
    },

    /// Any other status of 400 or above.
    #[error("HTTP {status}{}", body_suffix(.body))]
    Http {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Truncated response body.
        body: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL's host is outside the allowlist.
    #[error("Host not allowed: {0}")]
    HostNotAllowed(String),

    /// The response body is not the expected JSON.
    #[error("failed to parse response from {url}: {source}")]
    Parse {
        /// Requested URL.
        url: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Browser cookie import failed.
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// No strategy could run.
    #[error("Strategy not available: {0}")]
    StrategyNotAvailable(String),

    /// Every strategy in a pipeline failed.
    #[error("All strategies failed: {}", .0.join("; "))]
    AllStrategiesFailed(Vec<String>),
}

impl FetchError {
    /// Returns true for 401/403 responses.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }

    /// Status code of an HTTP failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthRequired { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

// ============================================================================
// Browser Error
// ============================================================================

/// Error type for browser cookie operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Browser not found.
    #[error("Browser not found: {0}")]
    BrowserNotFound(String),

    /// No browsers available.
    #[error("No browsers available")]
    NoBrowsersAvailable,

    /// Cookie database not found.
    #[error("No Cookies DB found for {browser}: {path}")]
    DatabaseNotFound {
        /// Browser name.
        browser: String,
        /// Expected database path.
        path: String,
    },

    /// Failed to read cookies.
    #[error("Failed to read cookies: {0}")]
    ReadFailed(String),

    /// No cookies found for domain.
    #[error("no cookies found for domain: {0}")]
    NoCookiesFound(String),

    /// Cookie decryption failed.
    #[error("Cookie decryption failed: {0}")]
    DecryptionFailed(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for BrowserError {
    fn from(err: rusqlite::Error) -> Self {
        Self::ReadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_display_with_body() {
        let err = FetchError::Http {
            status: 500,
            url: "https://www.alza.sk/x".into(),
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_auth_required());
    }

    #[test]
    fn test_http_display_without_body() {
        let err = FetchError::Http {
            status: 404,
            url: String::new(),
            body: String::new(),
        };
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn test_auth_required() {
        let err = FetchError::AuthRequired {
            status: 401,
            url: String::new(),
            body: String::new(),
        };
        assert!(err.is_auth_required());
        assert_eq!(err.to_string(), "auth required: HTTP 401");
    }

    #[test]
    fn test_all_strategies_failed_joins_messages() {
        let err = FetchError::AllStrategiesFailed(vec!["a: x".into(), "b: y".into()]);
        assert_eq!(err.to_string(), "All strategies failed: a: x; b: y");
    }
}
