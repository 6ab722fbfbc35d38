//! Host APIs used by the client.
//!
//! - [`http`] - HTTP client with tracing, browser headers and domain allowlist
//! - [`headers`] - The browser-like default header set
//! - [`browser`] - Browser cookie import

pub mod browser;
pub mod headers;
pub mod http;

pub use browser::{Browser, BrowserCookieImporter, Cookie, CookieQuery};
pub use http::{ApiResponse, DEFAULT_BASE_URL, HttpClient};
