//! CLI command implementations.

pub mod cart;
pub mod favorites;
pub mod lists;
pub mod orders;
pub mod product;
pub mod quickbuy;
pub mod search;
pub mod token;
pub mod whoami;

use std::future::Future;

use alza_client::{
    AuthRecovery, COOKIE_DOMAIN, ClientResult, CookieTokenRefresher, Session, ShopClient,
};
use alza_fetch::CookieQuery;
use alza_fetch::host::browser::default_profile;
use alza_store::TokenStore;
use anyhow::Result;
use serde::Serialize;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Client, token store and recovery loop shared by the shop commands.
pub struct Shop {
    /// API client.
    pub client: ShopClient,
    /// Token file.
    pub store: TokenStore,
    recovery: AuthRecovery<CookieTokenRefresher>,
}

impl Shop {
    /// Builds the client for the live shop with cookie-based recovery.
    pub fn connect() -> Result<Self> {
        let client = ShopClient::new()?;
        let store = TokenStore::at_default_path()?;
        let query = CookieQuery::new(COOKIE_DOMAIN).with_profile(default_profile());
        let refresher = CookieTokenRefresher::new(client.clone(), store.clone(), query);
        Ok(Self {
            client,
            store,
            recovery: AuthRecovery::new(refresher),
        })
    }

    /// Loads and validates the stored token.
    pub async fn open(&self) -> ClientResult<Session> {
        self.client.open_session(&self.store).await
    }

    /// Runs `operation` with one token refresh and retry on auth expiry.
    pub async fn run<T, F, Fut>(&self, operation: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        self.recovery.run(operation).await
    }
}

/// Prints `value` as JSON, or as text rendered by `text`.
pub fn emit<T: Serialize>(
    cli: &Cli,
    value: &T,
    text: impl FnOnce(&TextFormatter, &T) -> String,
) -> Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(value)?),
        OutputFormat::Text => {
            let rendered = text(&TextFormatter::new(cli.use_colors()), value);
            if !rendered.is_empty() {
                println!("{rendered}");
            }
        }
    }
    Ok(())
}

/// Prints a confirmation line, or `{"ok": true, ...}` in JSON mode.
pub fn emit_done<T: Serialize>(cli: &Cli, message: &str, value: &T) -> Result<()> {
    #[derive(Serialize)]
    struct Done<'a, T> {
        ok: bool,
        message: &'a str,
        #[serde(flatten)]
        value: &'a T,
    }

    match cli.format {
        OutputFormat::Json => {
            let done = Done {
                ok: true,
                message,
                value,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&done)?);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", TextFormatter::new(cli.use_colors()).success(message));
            }
        }
    }
    Ok(())
}
