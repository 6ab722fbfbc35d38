//! Browser cookie import.
//!
//! Reads the shop's session cookies straight from a local browser profile so
//! an expired API token can be exchanged for a fresh one without a login
//! flow.
//!
//! ## Supported Browsers
//!
//! - **Chrome / Chromium / Brave / Edge**: SQLite `Cookies` database with
//!   AES-128-CBC encrypted values (macOS keychain or Linux secret service)
//! - **Firefox**: SQLite `cookies.sqlite`, plain values
//!
//! ## Security Note
//!
//! Cookie data is sensitive. Only cookies for the requested domain are
//! read, and values are never logged.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument, trace};

use crate::error::BrowserError;

/// Microseconds between 1601-01-01 and 1970-01-01.
const WINDOWS_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600_000_000;

/// Profile directory used by a dedicated login browser, relative to home.
const DEDICATED_PROFILE_DIR: &str = ".config/alza/pw-profile";

// ============================================================================
// Browser Enum
// ============================================================================

/// Supported browsers for cookie import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Browser {
    /// Google Chrome.
    Chrome,
    /// Chromium.
    Chromium,
    /// Brave (Chromium-based).
    Brave,
    /// Microsoft Edge (Chromium-based).
    Edge,
    /// Mozilla Firefox.
    Firefox,
}

impl Browser {
    /// Returns the display name for this browser.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Chromium => "Chromium",
            Self::Brave => "Brave",
            Self::Edge => "Edge",
            Self::Firefox => "Firefox",
        }
    }

    /// Directory holding the browser's profiles.
    #[cfg(target_os = "macos")]
    pub fn user_data_dir(&self) -> Option<PathBuf> {
        let base = dirs::home_dir()?.join("Library/Application Support");
        Some(match self {
            Self::Chrome => base.join("Google/Chrome"),
            Self::Chromium => base.join("Chromium"),
            Self::Brave => base.join("BraveSoftware/Brave-Browser"),
            Self::Edge => base.join("Microsoft Edge"),
            Self::Firefox => base.join("Firefox/Profiles"),
        })
    }

    /// Directory holding the browser's profiles.
    #[cfg(not(target_os = "macos"))]
    pub fn user_data_dir(&self) -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(match self {
            Self::Chrome => home.join(".config/google-chrome"),
            Self::Chromium => home.join(".config/chromium"),
            Self::Brave => home.join(".config/BraveSoftware/Brave-Browser"),
            Self::Edge => home.join(".config/microsoft-edge"),
            Self::Firefox => home.join(".mozilla/firefox"),
        })
    }

    /// Returns the cookie database path for a named profile.
    ///
    /// Firefox ignores the name and uses its default profile.
    pub fn cookie_db_path(&self, profile: &str) -> Option<PathBuf> {
        let data_dir = self.user_data_dir()?;
        match self {
            Self::Firefox => {
                find_firefox_default_profile(&data_dir).map(|p| p.join("cookies.sqlite"))
            }
            _ => chromium_cookie_db(&data_dir.join(profile)),
        }
    }

    /// Whether this browser uses encrypted cookies.
    pub fn uses_encrypted_cookies(&self) -> bool {
        !matches!(self, Self::Firefox)
    }

    /// Keychain service and account holding the cookie encryption password.
    fn safe_storage(&self) -> (&'static str, &'static str) {
        match self {
            Self::Chrome | Self::Firefox => ("Chrome Safe Storage", "Chrome"),
            Self::Chromium => ("Chromium Safe Storage", "Chromium"),
            Self::Brave => ("Brave Safe Storage", "Brave"),
            Self::Edge => ("Microsoft Edge Safe Storage", "Microsoft Edge"),
        }
    }

    /// Returns all browser variants.
    pub fn all() -> &'static [Browser] {
        &[
            Self::Chrome,
            Self::Chromium,
            Self::Brave,
            Self::Edge,
            Self::Firefox,
        ]
    }

    /// Default priority order for auto-detection.
    pub fn default_priority() -> &'static [Browser] {
        Self::all()
    }
}

/// Find the default Firefox profile directory.
fn find_firefox_default_profile(profiles_dir: &Path) -> Option<PathBuf> {
    if !profiles_dir.exists() {
        return None;
    }

    let entries = fs::read_dir(profiles_dir).ok()?;

    let mut default_profile: Option<PathBuf> = None;
    let mut any_profile: Option<PathBuf> = None;

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.path().is_dir() {
            if name.ends_with(".default-release") {
                return Some(entry.path());
            } else if name.ends_with(".default") {
                default_profile = Some(entry.path());
            } else {
                any_profile = Some(entry.path());
            }
        }
    }

    default_profile.or(any_profile)
}

/// Locates the cookie DB inside a Chromium profile directory.
///
/// Newer versions keep it under `Network/`.
fn chromium_cookie_db(profile_dir: &Path) -> Option<PathBuf> {
    [
        profile_dir.join("Network").join("Cookies"),
        profile_dir.join("Cookies"),
    ]
    .into_iter()
    .find(|p| p.is_file())
}

/// Expands a leading `~/` to the home directory.
pub fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    }
}

/// The default profile: the dedicated login profile when it exists
/// (its `Default` subdirectory if present), otherwise `Default`.
pub fn default_profile() -> String {
    let Some(dedicated) = dirs::home_dir().map(|h| h.join(DEDICATED_PROFILE_DIR)) else {
        return "Default".to_string();
    };
    if !dedicated.is_dir() {
        return "Default".to_string();
    }
    let nested = dedicated.join("Default");
    if nested.is_dir() {
        nested.display().to_string()
    } else {
        dedicated.display().to_string()
    }
}

fn looks_like_path(profile: &str) -> bool {
    profile.contains(std::path::MAIN_SEPARATOR) || profile.starts_with('~') || profile.contains('/')
}

// ============================================================================
// Cookie
// ============================================================================

/// A browser cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain the cookie belongs to.
    pub domain: String,
    /// Path the cookie is valid for.
    pub path: String,
    /// Expiration time.
    pub expires: Option<DateTime<Utc>>,
    /// Whether the cookie requires HTTPS.
    pub secure: bool,
    /// Whether the cookie is HTTP-only.
    pub http_only: bool,
}

impl Cookie {
    /// Returns true if the cookie is expired.
    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|exp| exp < Utc::now())
    }

    /// Returns true if this cookie matches the given domain.
    pub fn matches_domain(&self, domain: &str) -> bool {
        let cookie_domain = self.domain.trim_start_matches('.');
        domain == cookie_domain
            || domain.ends_with(&format!(".{cookie_domain}"))
            || cookie_domain.ends_with(&format!(".{domain}"))
    }
}

// ============================================================================
// Cookie Query
// ============================================================================

/// Where to look for cookies.
#[derive(Debug, Clone, Default)]
pub struct CookieQuery {
    /// Registrable domain, e.g. `alza.sk`.
    pub domain: String,
    /// Chromium profile name (`Default`, `Profile 1`) or profile directory.
    pub profile: Option<String>,
    /// Explicit cookie database, bypassing profile discovery.
    pub cookie_db: Option<PathBuf>,
}

impl CookieQuery {
    /// Query for `domain` in the default locations.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Sets the profile name or directory.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        let profile = profile.into();
        self.profile = (!profile.trim().is_empty()).then(|| profile.trim().to_string());
        self
    }

    /// Sets an explicit cookie database path.
    #[must_use]
    pub fn with_cookie_db(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_db = Some(path.into());
        self
    }
}

// ============================================================================
// Browser Cookie Importer
// ============================================================================

/// API for importing cookies from browsers.
#[derive(Debug, Clone, Default)]
pub struct BrowserCookieImporter;

impl BrowserCookieImporter {
    /// Creates a new browser cookie importer.
    pub fn new() -> Self {
        Self
    }

    /// Import cookies for a domain from a browser's `Default` profile.
    #[instrument(skip(self), fields(browser = %browser.display_name(), domain = %domain))]
    pub async fn import_cookies(
        &self,
        browser: Browser,
        domain: &str,
    ) -> Result<Vec<Cookie>, BrowserError> {
        let db_path = browser.cookie_db_path("Default").ok_or_else(|| {
            BrowserError::DatabaseNotFound {
                browser: browser.display_name().to_string(),
                path: browser
                    .user_data_dir()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            }
        })?;

        self.import_from_db(browser, &db_path, domain)
    }

    /// Import cookies from the first available browser (in priority order).
    #[instrument(skip(self, priority), fields(domain = %domain))]
    pub async fn import_cookies_auto(
        &self,
        domain: &str,
        priority: &[Browser],
    ) -> Result<(Browser, Vec<Cookie>), BrowserError> {
        debug!("Auto-importing cookies");

        let mut last_error = None;

        for browser in priority {
            match self.import_cookies(*browser, domain).await {
                Ok(cookies) => {
                    debug!(browser = %browser.display_name(), count = cookies.len(), "Found cookies");
                    return Ok((*browser, cookies));
                }
                Err(e) => {
                    trace!(browser = %browser.display_name(), error = %e, "Browser skipped");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(BrowserError::NoBrowsersAvailable))
    }

    /// Import cookies as described by `query`.
    ///
    /// An explicit database wins. A profile that looks like a path is read
    /// as a Chromium profile directory. A profile name is looked up in
    /// every installed Chromium browser. Without either, browsers are tried
    /// in default priority order.
    #[instrument(skip(self, query), fields(domain = %query.domain))]
    pub async fn import_for(&self, query: &CookieQuery) -> Result<Vec<Cookie>, BrowserError> {
        if let Some(db) = &query.cookie_db {
            let browser = if db.file_name().is_some_and(|n| n == "cookies.sqlite") {
                Browser::Firefox
            } else {
                Browser::Chrome
            };
            return self.import_from_db(browser, db, &query.domain);
        }

        match query.profile.as_deref() {
            Some(profile) if looks_like_path(profile) => {
                let dir = expand_home(profile);
                let db = chromium_cookie_db(&dir).ok_or_else(|| BrowserError::DatabaseNotFound {
                    browser: Browser::Chrome.display_name().to_string(),
                    path: dir.display().to_string(),
                })?;
                self.import_from_db(Browser::Chrome, &db, &query.domain)
            }
            Some(profile) => {
                let mut last_error = None;
                for browser in Browser::all().iter().filter(|b| b.uses_encrypted_cookies()) {
                    let Some(db) = browser.cookie_db_path(profile) else {
                        continue;
                    };
                    match self.import_from_db(*browser, &db, &query.domain) {
                        Ok(cookies) => return Ok(cookies),
                        Err(e) => last_error = Some(e),
                    }
                }
                Err(last_error.unwrap_or_else(|| BrowserError::DatabaseNotFound {
                    browser: "Chromium".to_string(),
                    path: profile.to_string(),
                }))
            }
            None => self
                .import_cookies_auto(&query.domain, Browser::default_priority())
                .await
                .map(|(_, cookies)| cookies),
        }
    }

    /// Build a cookie header string for HTTP requests.
    pub fn cookies_to_header(cookies: &[Cookie]) -> String {
        cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn import_from_db(
        &self,
        browser: Browser,
        db_path: &Path,
        domain: &str,
    ) -> Result<Vec<Cookie>, BrowserError> {
        if !db_path.is_file() {
            return Err(BrowserError::DatabaseNotFound {
                browser: browser.display_name().to_string(),
                path: db_path.display().to_string(),
            });
        }

        let cookies = match browser {
            Browser::Firefox => self.read_firefox_cookies(db_path, domain)?,
            _ => self.read_chromium_cookies(db_path, domain, browser)?,
        };

        let cookies: Vec<Cookie> = cookies.into_iter().filter(|c| !c.is_expired()).collect();

        if cookies.is_empty() {
            return Err(BrowserError::NoCookiesFound(domain.to_string()));
        }

        debug!(count = cookies.len(), "Cookies imported successfully");
        Ok(cookies)
    }

    // ========================================================================
    // Firefox Cookies
    // ========================================================================

    fn read_firefox_cookies(&self, db_path: &Path, domain: &str) -> Result<Vec<Cookie>, BrowserError> {
        debug!(path = %db_path.display(), "Reading Firefox cookies");

        // Firefox locks the database, so copy to temp
        let temp = TempCopy::of(db_path)?;
        let conn = Connection::open_with_flags(temp.path(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let mut stmt = conn.prepare(
            "SELECT name, value, host, path, expiry, isSecure, isHttpOnly
             FROM moz_cookies
             WHERE host LIKE ?1 OR host = ?2",
        )?;

        let domain_pattern = format!("%.{domain}");

        let cookies = stmt
            .query_map([domain_pattern.as_str(), domain], |row| {
                let expiry: i64 = row.get(4)?;
                let expires = if expiry > 0 {
                    Utc.timestamp_opt(expiry, 0).single()
                } else {
                    None
                };

                Ok(Cookie {
                    name: row.get(0)?,
                    value: row.get(1)?,
                    domain: row.get(2)?,
                    path: row.get(3)?,
                    expires,
                    secure: row.get::<_, i32>(5)? != 0,
                    http_only: row.get::<_, i32>(6)? != 0,
                })
            })?
            .filter_map(Result::ok)
            .collect();

        Ok(cookies)
    }

    // ========================================================================
    // Chromium Cookies
    // ========================================================================

    fn read_chromium_cookies(
        &self,
        db_path: &Path,
        domain: &str,
        browser: Browser,
    ) -> Result<Vec<Cookie>, BrowserError> {
        debug!(path = %db_path.display(), browser = %browser.display_name(), "Reading Chromium cookies");

        let rows: Vec<ChromiumRow> = {
            let temp = TempCopy::of(db_path)?;
            let conn = Connection::open_with_flags(temp.path(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;

            let mut stmt = conn.prepare(
                "SELECT name, value, encrypted_value, host_key, path, expires_utc, is_secure, is_httponly
                 FROM cookies
                 WHERE host_key LIKE ?1 OR host_key = ?2",
            )?;

            let domain_pattern = format!("%.{domain}");
            let rows = stmt.query_map([domain_pattern.as_str(), domain], |row| {
                Ok(ChromiumRow {
                    name: row.get(0)?,
                    value: row.get(1)?,
                    encrypted_value: row.get(2)?,
                    host_key: row.get(3)?,
                    path: row.get(4)?,
                    expires_utc: row.get(5)?,
                    secure: row.get::<_, i32>(6)? != 0,
                    http_only: row.get::<_, i32>(7)? != 0,
                })
            })?
            .filter_map(Result::ok)
            .collect();
            rows
        };

        let mut key: Option<[u8; 16]> = None;
        let mut cookies = Vec::with_capacity(rows.len());

        for row in rows {
            let expires = if row.expires_utc > 0 {
                let unix_secs = (row.expires_utc - WINDOWS_EPOCH_OFFSET_MICROS) / 1_000_000;
                Utc.timestamp_opt(unix_secs, 0).single()
            } else {
                None
            };

            let value = if !row.value.is_empty() {
                row.value
            } else if !row.encrypted_value.is_empty() {
                let cipher_key = if let Some(k) = key {
                    k
                } else {
                    let k = chromium_key(browser)?;
                    key = Some(k);
                    k
                };
                match decrypt_chromium_cookie(&row.encrypted_value, &row.host_key, &cipher_key) {
                    Ok(decrypted) => decrypted,
                    Err(e) => {
                        trace!(name = %row.name, error = %e, "Failed to decrypt cookie, skipping");
                        continue;
                    }
                }
            } else {
                continue;
            };

            cookies.push(Cookie {
                name: row.name,
                value,
                domain: row.host_key,
                path: row.path,
                expires,
                secure: row.secure,
                http_only: row.http_only,
            });
        }

        Ok(cookies)
    }
}

struct ChromiumRow {
    name: String,
    value: String,
    encrypted_value: Vec<u8>,
    host_key: String,
    path: String,
    expires_utc: i64,
    secure: bool,
    http_only: bool,
}

// ============================================================================
// Helper Functions
// ============================================================================

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// A temp copy of a locked database, removed on drop.
struct TempCopy(PathBuf);

impl TempCopy {
    fn of(source: &Path) -> Result<Self, BrowserError> {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp_path = std::env::temp_dir().join(format!(
            "alza_cookies_{}_{seq}.sqlite",
            std::process::id()
        ));
        fs::copy(source, &temp_path)
            .map_err(|e| BrowserError::ReadFailed(format!("Failed to copy database: {e}")))?;
        Ok(Self(temp_path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempCopy {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

#[cfg(target_os = "macos")]
const PBKDF2_ITERATIONS: u32 = 1003;
#[cfg(not(target_os = "macos"))]
const PBKDF2_ITERATIONS: u32 = 1;

/// Password used by Chromium on Linux when no keyring is available.
#[cfg(not(target_os = "macos"))]
const LINUX_FALLBACK_PASSWORD: &str = "peanuts";

/// Fetches the safe-storage password and derives the AES key.
fn chromium_key(browser: Browser) -> Result<[u8; 16], BrowserError> {
    let password = safe_storage_password(browser)?;
    derive_key(&password, PBKDF2_ITERATIONS)
}

#[cfg(target_os = "macos")]
fn safe_storage_password(browser: Browser) -> Result<String, BrowserError> {
    let (service, account) = browser.safe_storage();
    keyring::Entry::new(service, account)
        .and_then(|entry| entry.get_password())
        .map_err(|e| BrowserError::DecryptionFailed(format!("No keychain entry: {e}")))
}

#[cfg(not(target_os = "macos"))]
fn safe_storage_password(browser: Browser) -> Result<String, BrowserError> {
    let (service, account) = browser.safe_storage();
    let password = keyring::Entry::new(service, account)
        .and_then(|entry| entry.get_password())
        .unwrap_or_else(|e| {
            trace!(error = %e, "No secret service entry, using fallback password");
            LINUX_FALLBACK_PASSWORD.to_string()
        });
    Ok(password)
}

/// PBKDF2-HMAC-SHA1 over the `saltysalt` salt, 16-byte output.
fn derive_key(password: &str, iterations: u32) -> Result<[u8; 16], BrowserError> {
    let iterations = std::num::NonZeroU32::new(iterations)
        .ok_or_else(|| BrowserError::DecryptionFailed("zero PBKDF2 iterations".to_string()))?;
    let mut key = [0u8; 16];
    ring::pbkdf2::derive(
        ring::pbkdf2::PBKDF2_HMAC_SHA1,
        iterations,
        b"saltysalt",
        password.as_bytes(),
        &mut key,
    );
    Ok(key)
}

/// Decrypt a Chromium `v10`/`v11` cookie value.
fn decrypt_chromium_cookie(
    encrypted: &[u8],
    host_key: &str,
    key: &[u8; 16],
) -> Result<String, BrowserError> {
    if encrypted.len() < 4 {
        return Err(BrowserError::DecryptionFailed("Data too short".to_string()));
    }

    let version = &encrypted[0..3];
    if version != b"v10" && version != b"v11" {
        return Err(BrowserError::DecryptionFailed(format!(
            "Unknown encryption version: {version:?}"
        )));
    }

    let iv = [b' '; 16];
    let decrypted = decrypt_aes_cbc(key, &iv, &encrypted[3..])
        .map_err(|e| BrowserError::DecryptionFailed(format!("AES error: {e}")))?;

    let plain = strip_host_digest(&decrypted, host_key);
    String::from_utf8(plain.to_vec())
        .map_err(|e| BrowserError::DecryptionFailed(format!("UTF-8 error: {e}")))
}

/// Newer Chromium versions prefix the plaintext with SHA-256 of the host key.
fn strip_host_digest<'a>(plain: &'a [u8], host_key: &str) -> &'a [u8] {
    let digest = ring::digest::digest(&ring::digest::SHA256, host_key.as_bytes());
    match plain.strip_prefix(digest.as_ref()) {
        Some(rest) => rest,
        None => plain,
    }
}

/// Decrypt data using AES-128-CBC through the `openssl` binary.
///
/// Key material goes through environment variables, not arguments, so it
/// never shows up in process listings.
#[cfg(unix)]
fn decrypt_aes_cbc(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, String> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new("sh")
        .arg("-c")
        .arg("openssl enc -d -aes-128-cbc -K \"$OPENSSL_KEY\" -iv \"$OPENSSL_IV\"")
        .env("OPENSSL_KEY", hex::encode(key))
        .env("OPENSSL_IV", hex::encode(iv))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| e.to_string())?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(data).map_err(|e| e.to_string())?;
    }

    let output = child.wait_with_output().map_err(|e| e.to_string())?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err("Decryption failed".to_string())
    }
}

#[cfg(not(unix))]
fn decrypt_aes_cbc(_key: &[u8], _iv: &[u8], _data: &[u8]) -> Result<Vec<u8>, String> {
    Err("Chromium cookie decryption is only supported on macOS and Linux".to_string())
}

mod hex {
    pub fn encode(data: &[u8]) -> String {
        data.iter().map(|b| format!("{b:02x}")).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(name: &str, value: &str, domain: &str) -> Cookie {
        Cookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
            path: "/".to_string(),
            expires: None,
            secure: true,
            http_only: true,
        }
    }

    fn firefox_db(dir: &Path, rows: &[(&str, &str, &str, i64)]) -> PathBuf {
        let path = dir.join("cookies.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE moz_cookies (id INTEGER PRIMARY KEY, name TEXT, value TEXT,
             host TEXT, path TEXT, expiry INTEGER, isSecure INTEGER, isHttpOnly INTEGER)",
        )
        .unwrap();
        for (name, value, host, expiry) in rows {
            conn.execute(
                "INSERT INTO moz_cookies (name, value, host, path, expiry, isSecure, isHttpOnly)
                 VALUES (?1, ?2, ?3, '/', ?4, 1, 0)",
                rusqlite::params![name, value, host, expiry],
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn test_cookie_matches_domain() {
        let cookie = cookie("session", "abc", ".alza.sk");
        assert!(cookie.matches_domain("alza.sk"));
        assert!(cookie.matches_domain("www.alza.sk"));
        assert!(!cookie.matches_domain("notalza.sk"));
    }

    #[test]
    fn test_cookies_to_header() {
        let cookies = vec![
            cookie("session", "abc", ".alza.sk"),
            cookie("VZTX", "xyz", "www.alza.sk"),
        ];
        assert_eq!(
            BrowserCookieImporter::cookies_to_header(&cookies),
            "session=abc; VZTX=xyz"
        );
    }

    #[test]
    fn test_cookie_is_expired() {
        let mut c = cookie("a", "b", "alza.sk");
        assert!(!c.is_expired());
        c.expires = Some(Utc::now() - chrono::Duration::hours(1));
        assert!(c.is_expired());
        c.expires = Some(Utc::now() + chrono::Duration::hours(1));
        assert!(!c.is_expired());
    }

    #[test]
    fn test_strip_host_digest() {
        let digest = ring::digest::digest(&ring::digest::SHA256, b".alza.sk");
        let mut plain = digest.as_ref().to_vec();
        plain.extend_from_slice(b"value");
        assert_eq!(strip_host_digest(&plain, ".alza.sk"), b"value");
        assert_eq!(strip_host_digest(b"value", ".alza.sk"), b"value");
    }

    #[test]
    fn test_derive_key_depends_on_iterations() {
        let one = derive_key("peanuts", 1).unwrap();
        let many = derive_key("peanuts", 1003).unwrap();
        assert_ne!(one, many);
        assert!(derive_key("peanuts", 0).is_err());
    }

    #[test]
    fn test_decrypt_rejects_unknown_version() {
        let err = decrypt_chromium_cookie(b"v99abcdef", ".alza.sk", &[0u8; 16]).unwrap_err();
        assert!(err.to_string().contains("Unknown encryption version"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/a/b"), home.join("a/b"));
        }
    }

    #[test]
    fn test_profile_path_detection() {
        assert!(looks_like_path("~/.config/alza/pw-profile"));
        assert!(looks_like_path("/home/u/profile"));
        assert!(!looks_like_path("Profile 1"));
    }

    #[tokio::test]
    async fn test_import_from_explicit_firefox_db() {
        let dir = tempfile::tempdir().unwrap();
        let future = (Utc::now() + chrono::Duration::days(1)).timestamp();
        let past = (Utc::now() - chrono::Duration::days(1)).timestamp();
        let db = firefox_db(
            dir.path(),
            &[
                ("session", "abc", ".alza.sk", future),
                ("old", "gone", ".alza.sk", past),
                ("other", "nope", ".example.com", future),
            ],
        );

        let importer = BrowserCookieImporter::new();
        let cookies = importer
            .import_for(&CookieQuery::new("alza.sk").with_cookie_db(db))
            .await
            .unwrap();

        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "session");
    }

    #[tokio::test]
    async fn test_import_no_matching_cookies() {
        let dir = tempfile::tempdir().unwrap();
        let db = firefox_db(dir.path(), &[("other", "nope", ".example.com", 0)]);

        let err = BrowserCookieImporter::new()
            .import_for(&CookieQuery::new("alza.sk").with_cookie_db(db))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::NoCookiesFound(_)));
    }

    #[tokio::test]
    async fn test_missing_profile_dir() {
        let err = BrowserCookieImporter::new()
            .import_for(&CookieQuery::new("alza.sk").with_profile("/nonexistent/profile"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No Cookies DB found"));
    }
}
