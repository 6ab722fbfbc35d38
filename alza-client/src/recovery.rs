//! Auth recovery.
//!
//! Tokens expire while the browser session that minted them lives on.
//! [`AuthRecovery`] runs an operation, and when it fails on expired
//! credentials, asks a [`CredentialRefresher`] for a fresh token and runs
//! the operation one more time.

use std::future::Future;

use alza_fetch::{BrowserCookieImporter, CookieQuery, FetchError};
use alza_store::TokenStore;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::client::ShopClient;
use crate::error::{ClientError, ClientResult};

/// Cookie domain the shop session lives on.
pub const COOKIE_DOMAIN: &str = "alza.sk";

// ============================================================================
// Credential Refresher
// ============================================================================

/// Something that can mint and persist a fresh token.
#[async_trait]
pub trait CredentialRefresher: Send + Sync {
    /// Produces a new token, stores it, and returns it.
    async fn refresh(&self) -> ClientResult<String>;
}

/// Mints tokens from the cookies of a logged-in browser.
#[derive(Debug, Clone)]
pub struct CookieTokenRefresher {
    client: ShopClient,
    store: TokenStore,
    query: CookieQuery,
    importer: BrowserCookieImporter,
}

impl CookieTokenRefresher {
    /// Creates a refresher reading cookies as described by `query`.
    pub fn new(client: ShopClient, store: TokenStore, query: CookieQuery) -> Self {
        Self {
            client,
            store,
            query,
            importer: BrowserCookieImporter::new(),
        }
    }

    /// Where the fresh token is written.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Reads the browser cookies and renders them as a `Cookie` header.
    pub async fn cookie_header(&self) -> ClientResult<String> {
        let cookies = self
            .importer
            .import_for(&self.query)
            .await
            .map_err(FetchError::Browser)?;
        debug!(count = cookies.len(), "Browser cookies imported");
        Ok(BrowserCookieImporter::cookies_to_header(&cookies))
    }
}

#[async_trait]
impl CredentialRefresher for CookieTokenRefresher {
    #[instrument(skip(self), fields(domain = %self.query.domain))]
    async fn refresh(&self) -> ClientResult<String> {
        let header = self.cookie_header().await?;
        let token = self.client.exchange_token(&header).await?;
        self.store.save(&token).await?;
        info!(path = %self.store.path().display(), "Token refreshed");
        Ok(token)
    }
}

// ============================================================================
// Recovery Loop
// ============================================================================

/// Retries an operation once after refreshing expired credentials.
#[derive(Debug)]
pub struct AuthRecovery<R> {
    refresher: R,
}

impl<R: CredentialRefresher> AuthRecovery<R> {
    /// Creates a recovery loop around `refresher`.
    pub fn new(refresher: R) -> Self {
        Self { refresher }
    }

    /// The refresher used on auth expiry.
    pub fn refresher(&self) -> &R {
        &self.refresher
    }

    /// Runs `operation`, refreshing and retrying once on auth expiry.
    ///
    /// The closure should build everything that depends on the token
    /// (session included) so the retry picks up the new one.
    ///
    /// # Errors
    ///
    /// Non-auth failures and failures of the retry are returned as they
    /// are. A failed refresh yields [`ClientError::RecoveryFailed`]
    /// carrying both the original failure and the refresh failure.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> ClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let original = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_auth_expired() => err,
            Err(err) => return Err(err),
        };

        warn!(error = %original, "Auth expired, refreshing token");
        if let Err(refresh) = self.refresher.refresh().await {
            warn!(error = %refresh, "Token refresh failed");
            return Err(ClientError::RecoveryFailed {
                original: Box::new(original),
                refresh: Box::new(refresh),
            });
        }

        debug!("Retrying after token refresh");
        operation().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRefresher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingRefresher {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialRefresher for CountingRefresher {
        async fn refresh(&self) -> ClientResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ClientError::AuthRequired("no cookies found".into()))
            } else {
                Ok("Bearer fresh".into())
            }
        }
    }

    #[tokio::test]
    async fn test_success_skips_refresh() {
        let recovery = AuthRecovery::new(CountingRefresher::new(false));
        let value = recovery.run(|| async { Ok::<_, ClientError>(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(recovery.refresher().calls(), 0);
    }

    #[tokio::test]
    async fn test_retries_exactly_once() {
        let recovery = AuthRecovery::new(CountingRefresher::new(false));
        let attempts = AtomicUsize::new(0);

        let err = recovery
            .run(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(ClientError::TokenExpired) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::TokenExpired));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(recovery.refresher().calls(), 1);
    }

    #[tokio::test]
    async fn test_non_auth_error_not_retried() {
        let recovery = AuthRecovery::new(CountingRefresher::new(false));
        let err = recovery
            .run(|| async { Err::<(), _>(ClientError::ProductNotInCart(5)) })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ProductNotInCart(5)));
        assert_eq!(recovery.refresher().calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_failure_wraps_both() {
        let recovery = AuthRecovery::new(CountingRefresher::new(true));
        let err = recovery
            .run(|| async { Err::<(), _>(ClientError::TokenExpired) })
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("TOKEN EXPIRED"));
        assert!(message.contains("no cookies found"));
        assert!(err.is_auth_failure());
        assert!(!err.is_auth_expired());
    }
}
