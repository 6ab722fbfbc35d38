//! Token command - mint or copy the bearer token.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use alza_client::{
    COOKIE_DOMAIN, CookieTokenRefresher, CredentialRefresher, ShopClient, extract_bearer_line,
};
use alza_fetch::CookieQuery;
use alza_fetch::host::browser::{default_profile, expand_home};
use alza_store::TokenStore;
use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Subcommand};
use serde_json::json;
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

use super::emit_done;
use crate::Cli;

/// Error fragments that mean the browser session is missing or stale.
const LOGIN_NEEDLES: &[&str] = &[
    "No Cookies DB found",
    "no cookies found",
    "cookie header missing",
    "token endpoint returned HTML",
    "missing accessToken",
    "session expired",
];

/// Arguments for the token command.
#[derive(Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub action: TokenAction,
}

/// Token subcommands.
#[derive(Subcommand)]
pub enum TokenAction {
    /// Exchange browser cookies for a fresh token.
    Refresh {
        /// Browser profile directory or name.
        #[arg(long)]
        chrome_profile: Option<String>,

        /// Explicit path to the cookie database.
        #[arg(long)]
        cookie_path: Option<PathBuf>,

        /// Shop URL whose cookies are used.
        #[arg(long, default_value = "https://www.alza.sk/")]
        url: String,
    },

    /// Copy the token from another machine over SSH.
    Pull {
        /// SSH host (from ~/.ssh/config or user@host).
        #[arg(long)]
        from: String,

        /// Remote token file.
        #[arg(long, default_value = "~/.config/alza/auth_token.txt")]
        remote_path: String,

        /// SSH timeout in seconds.
        #[arg(long, default_value = "15")]
        timeout_secs: u64,
    },
}

/// Runs the token command.
pub async fn run(args: &TokenArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        TokenAction::Refresh {
            chrome_profile,
            cookie_path,
            url,
        } => refresh(chrome_profile.as_deref(), cookie_path.as_ref(), url, cli).await,
        TokenAction::Pull {
            from,
            remote_path,
            timeout_secs,
        } => pull(from, remote_path, Duration::from_secs(*timeout_secs), cli).await,
    }
}

async fn refresh(
    profile: Option<&str>,
    cookie_path: Option<&PathBuf>,
    target: &str,
    cli: &Cli,
) -> Result<()> {
    let domain = cookie_domain(target)?;
    let profile = profile.map_or_else(default_profile, |p| expand_home(p).display().to_string());

    let mut query = CookieQuery::new(domain.clone()).with_profile(profile.clone());
    if let Some(path) = cookie_path {
        query = query.with_cookie_db(path.clone());
    }
    debug!(domain = %domain, profile = %profile, "Refreshing token from browser cookies");

    let store = TokenStore::at_default_path()?;
    let refresher = CookieTokenRefresher::new(ShopClient::new()?, store.clone(), query);
    if let Err(e) = refresher.refresh().await {
        let err = anyhow::Error::new(e);
        return Err(with_login_guidance(err, &profile, cookie_path));
    }

    emit_done(
        cli,
        "Token refreshed from browser cookies",
        &json!({ "path": store.path() }),
    )
}

async fn pull(host: &str, remote_path: &str, timeout: Duration, cli: &Cli) -> Result<()> {
    if host.trim().is_empty() {
        bail!("missing --from (SSH host)");
    }

    info!(host, remote_path, "Pulling token over SSH");
    let mut ssh = Command::new("ssh");
    ssh.args([host, "cat", "--", remote_path])
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .stdout(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout, ssh.output())
        .await
        .map_err(|_| anyhow!("ssh timed out after {}s", timeout.as_secs()))?
        .context("ssh failed")?;
    if !output.status.success() {
        bail!("ssh failed: {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let token = extract_bearer_line(&stdout)
        .ok_or_else(|| anyhow!("no bearer token found in {host}:{remote_path}"))?;

    let store = TokenStore::at_default_path()?;
    store.save(token).await?;

    emit_done(
        cli,
        &format!("Token pulled and saved to {}", store.path().display()),
        &json!({ "path": store.path(), "from": host }),
    )
}

/// Cookie domain for a shop URL, without a leading `www.`.
fn cookie_domain(target: &str) -> Result<String> {
    let url = Url::parse(target).with_context(|| format!("invalid --url: {target}"))?;
    Ok(url
        .host_str()
        .map(|host| host.trim_start_matches("www.").to_string())
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| COOKIE_DOMAIN.to_string()))
}

fn needs_login_guidance(message: &str) -> bool {
    let message = message.to_lowercase();
    LOGIN_NEEDLES
        .iter()
        .any(|needle| message.contains(&needle.to_lowercase()))
}

/// Wraps session-related failures with sign-in instructions.
fn with_login_guidance(
    err: anyhow::Error,
    profile: &str,
    cookie_path: Option<&PathBuf>,
) -> anyhow::Error {
    let message = format!("{err:#}");
    if !needs_login_guidance(&message) {
        return err;
    }

    let mut lines = vec![
        "Login required to refresh token.".to_string(),
        String::new(),
        "Desktop:".to_string(),
        "1) Sign in to https://www.alza.sk/ in your browser".to_string(),
        "2) Run: alza token refresh".to_string(),
        String::new(),
        "Headless server:".to_string(),
        "1) Sign in on a machine with a browser".to_string(),
        "2) Run: alza token pull --from <that host>".to_string(),
    ];
    if !profile.is_empty() {
        lines.extend([String::new(), "Detected profile:".to_string(), profile.to_string()]);
    }
    if let Some(path) = cookie_path {
        lines.extend([
            String::new(),
            "Explicit cookie path:".to_string(),
            path.display().to_string(),
        ]);
    }
    lines.extend([String::new(), "Original error:".to_string(), message]);

    anyhow!(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_login_guidance() {
        assert!(needs_login_guidance("No Cookies DB found for Chrome"));
        assert!(needs_login_guidance("token response returned logOut=true (SESSION EXPIRED)"));
        assert!(needs_login_guidance("token endpoint returned HTML (session missing or expired)"));
        assert!(!needs_login_guidance("HTTP 503 from /api/users/accesstoken"));
    }

    #[test]
    fn test_guidance_wraps_session_errors() {
        let err = with_login_guidance(
            anyhow!("cookie header missing (are you logged in in the browser?)"),
            "Default",
            Some(&PathBuf::from("/tmp/Cookies")),
        );
        let text = err.to_string();
        assert!(text.starts_with("Login required to refresh token."));
        assert!(text.contains("Detected profile:\nDefault"));
        assert!(text.contains("Explicit cookie path:\n/tmp/Cookies"));
        assert!(text.ends_with("cookie header missing (are you logged in in the browser?)"));
    }

    #[test]
    fn test_guidance_leaves_other_errors() {
        let err = with_login_guidance(anyhow!("disk full"), "Default", None);
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_cookie_domain() {
        assert_eq!(cookie_domain("https://www.alza.sk/").unwrap(), "alza.sk");
        assert_eq!(cookie_domain("https://alza.cz/x").unwrap(), "alza.cz");
        assert!(cookie_domain("not a url").is_err());
    }
}
