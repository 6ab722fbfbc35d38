//! Browser-like request headers.
//!
//! The API sits behind bot protection that inspects the header set, so every
//! request carries what a desktop Chrome 120 would send from the shop page.

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};

#[cfg(target_os = "macos")]
const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
#[cfg(target_os = "windows")]
const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CHROME_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[cfg(target_os = "macos")]
const CHROME_PLATFORM: &str = "\"macOS\"";
#[cfg(target_os = "windows")]
const CHROME_PLATFORM: &str = "\"Windows\"";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CHROME_PLATFORM: &str = "\"Linux\"";

const SEC_CH_UA: &str = "\"Chromium\";v=\"120\", \"Not A(Brand\";v=\"24\"";

/// The Chrome user agent for the current OS.
///
/// Also embedded in the payment request's browser block.
pub fn user_agent() -> &'static str {
    CHROME_USER_AGENT
}

/// Builds the default header set for requests originating from `origin`.
///
/// `origin` is the scheme and host without a trailing slash, e.g.
/// `https://www.alza.sk`.
pub fn browser_headers(origin: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CHROME_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("sk-SK"));

    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(ORIGIN, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{origin}/")) {
        headers.insert(REFERER, value);
    }

    let fixed = [
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-origin"),
        ("sec-ch-ua", SEC_CH_UA),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", CHROME_PLATFORM),
    ];
    for (name, value) in fixed {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers("https://www.alza.sk");
        assert_eq!(headers[ORIGIN], "https://www.alza.sk");
        assert_eq!(headers[REFERER], "https://www.alza.sk/");
        assert_eq!(headers[ACCEPT_LANGUAGE], "sk-SK");
        assert_eq!(headers["sec-fetch-mode"], "cors");
        assert!(
            headers[USER_AGENT]
                .to_str()
                .unwrap()
                .contains("Chrome/120")
        );
    }
}
