//! Browser-session to bearer-token exchange.
//!
//! A logged-in browser holds session cookies for the shop. The identity
//! endpoint trades them for an access token, but only while the browser
//! session is alive; otherwise it serves the login page or a log-out flag.

use alza_core::FieldProbe;
use alza_core::extract::snippet;
use alza_fetch::HttpClient;
use tracing::{debug, instrument};

use crate::client::ShopClient;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};

/// Prefix of stored tokens.
pub const BEARER_PREFIX: &str = "Bearer ";

/// How much of an unexpected body to quote in errors.
const TOKEN_SNIPPET_LIMIT: usize = 200;

/// Exchanges a `Cookie` header for a bearer token.
///
/// Returns the full `Authorization` value (`Bearer <token>`).
///
/// # Errors
///
/// [`ClientError::AuthRequired`] when the cookie header is empty, the
/// endpoint answers with HTML, the token is missing or the response says
/// the session is logged out. HTTP failures surface as
/// [`ClientError::Fetch`].
#[instrument(skip(http, cookie_header), fields(cookie_len = cookie_header.len()))]
pub async fn exchange_cookies_for_token(http: &HttpClient, cookie_header: &str) -> ClientResult<String> {
    let cookie_header = cookie_header.trim();
    if cookie_header.is_empty() {
        return Err(ClientError::AuthRequired(
            "cookie header missing (are you logged in in the browser?)".to_string(),
        ));
    }

    let response = http.get_with_cookies(endpoints::ACCESS_TOKEN, cookie_header).await?;
    debug!(status = response.status, content_type = %response.content_type, "Token response");

    if response.looks_like_html() {
        return Err(ClientError::AuthRequired(format!(
            "token endpoint returned HTML (session missing or expired): {}",
            snippet(&response.body, TOKEN_SNIPPET_LIMIT)
        )));
    }

    let doc = serde_json::from_str(&response.body)
        .map_err(|source| ClientError::parse("token response", source))?;

    let access_token = FieldProbe::new()
        .or(&["accessToken"])
        .or(&["AccessToken"])
        .string(&doc);
    let logged_out = FieldProbe::new()
        .or(&["logOut"])
        .or(&["LogOut"])
        .bool(&doc)
        .unwrap_or(false);

    let Some(access_token) = access_token else {
        return Err(ClientError::AuthRequired(
            "token response missing accessToken (are you logged in in the browser?)".to_string(),
        ));
    };
    if logged_out {
        return Err(ClientError::AuthRequired(
            "token response returned logOut=true (session expired)".to_string(),
        ));
    }

    debug!(token_len = access_token.len(), "Access token received");
    Ok(format!("{BEARER_PREFIX}{access_token}"))
}

impl ShopClient {
    /// Exchanges browser cookies for a bearer token over this client's transport.
    pub async fn exchange_token(&self, cookie_header: &str) -> ClientResult<String> {
        exchange_cookies_for_token(self.http(), cookie_header).await
    }
}

/// Picks the stored token out of remote command output.
///
/// Accepts the first line that starts with the bearer prefix and is long
/// enough to carry a real token.
pub fn extract_bearer_line(output: &str) -> Option<&str> {
    output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(BEARER_PREFIX) && line.len() > 40)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_line() {
        let token = format!("Bearer {}", "x".repeat(40));
        let output = format!("motd line\nBearer short\n  {token}  \nBearer other");
        assert_eq!(extract_bearer_line(&output), Some(token.as_str()));
        assert_eq!(extract_bearer_line("nothing here"), None);
    }

    #[tokio::test]
    async fn test_empty_cookie_header() {
        let http = HttpClient::new().unwrap();
        let err = exchange_cookies_for_token(&http, "  ").await.unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired(ref m) if m.contains("cookie header missing")));
    }
}
