//! Client errors.

use alza_core::CoreError;
use alza_fetch::FetchError;
use alza_store::StoreError;
use thiserror::Error;

/// Text the server (and [`ClientError::TokenExpired`]) use to report a
/// token that is no longer accepted.
pub const TOKEN_EXPIRED_MARKER: &str = "TOKEN EXPIRED";

/// Errors raised by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session is not authenticated (no token, log-out, login wall).
    #[error("auth required: {0}")]
    AuthRequired(String),

    /// The API no longer recognizes the token.
    #[error("TOKEN EXPIRED: the API rejected the auth token, run `alza token refresh`")]
    TokenExpired,

    /// A response body did not have the expected shape.
    #[error("failed to parse {context}: {source}")]
    Parse {
        /// What was being parsed.
        context: &'static str,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Purchase configuration failed validation.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The product has no removable line in the cart.
    #[error("product {0} not found in cart")]
    ProductNotInCart(u64),

    /// The basket has products but no preview link to derive its ID from.
    #[error("basket has items but no preview link")]
    MissingBasketLink,

    /// The basket preview link has no ID after its `basket` segment.
    #[error("cannot find basket ID in link: {0}")]
    MalformedBasketLink(String),

    /// No list matched the requested name or ID.
    #[error("list not found: {0}")]
    ListNotFound(String),

    /// The API answered but refused the operation.
    #[error("{step} rejected: {message}")]
    RemoteRejected {
        /// Operation step that was refused.
        step: &'static str,
        /// Message reported by the API.
        message: String,
    },

    /// Both search endpoints failed.
    #[error("search failed: {primary}; whisper fallback failed: {fallback}")]
    SearchFailed {
        /// Primary search error.
        primary: String,
        /// Fallback search error.
        fallback: String,
        /// Whether either endpoint rejected the credentials.
        auth_expired: bool,
    },

    /// The operation failed on auth, and refreshing the token failed too.
    #[error("{original} (token refresh failed: {refresh})")]
    RecoveryFailed {
        /// The auth failure that triggered recovery.
        original: Box<ClientError>,
        /// Why the refresh failed.
        refresh: Box<ClientError>,
    },

    /// Transport failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Local storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Wraps a JSON decode error with what was being decoded.
    pub fn parse(context: &'static str, source: serde_json::Error) -> Self {
        Self::Parse { context, source }
    }

    /// Whether this failure means the credentials are no longer valid.
    ///
    /// Recovery is only attempted for these.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::AuthRequired(_) | Self::TokenExpired => true,
            Self::Fetch(err) if err.is_auth_required() => true,
            Self::SearchFailed {
                auth_expired: true, ..
            } => true,
            Self::RecoveryFailed { .. } => false,
            other => other.to_string().contains(TOKEN_EXPIRED_MARKER),
        }
    }

    /// Whether this is an auth failure that recovery could not fix.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::RecoveryFailed { original, .. } => original.is_auth_expired(),
            other => other.is_auth_expired(),
        }
    }
}

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_expired_variants() {
        assert!(ClientError::TokenExpired.is_auth_expired());
        assert!(ClientError::AuthRequired("logOut=true".into()).is_auth_expired());
        assert!(
            ClientError::Fetch(FetchError::AuthRequired {
                status: 401,
                url: "https://www.alza.sk/x".into(),
                body: String::new(),
            })
            .is_auth_expired()
        );
    }

    #[test]
    fn test_marker_in_message() {
        let err = ClientError::RemoteRejected {
            step: "save",
            message: "TOKEN EXPIRED".into(),
        };
        assert!(err.is_auth_expired());
    }

    #[test]
    fn test_other_failures_not_auth() {
        assert!(!ClientError::ProductNotInCart(5).is_auth_expired());
        assert!(
            !ClientError::Fetch(FetchError::Http {
                status: 500,
                url: String::new(),
                body: "boom".into(),
            })
            .is_auth_expired()
        );
        assert!(
            !ClientError::Store(StoreError::TokenMissing("/tmp/t".into())).is_auth_expired()
        );
    }

    #[test]
    fn test_search_failed_classified_by_auth_flag() {
        let failed = |auth_expired| ClientError::SearchFailed {
            primary: "HTTP 502".into(),
            fallback: "auth required: HTTP 403".into(),
            auth_expired,
        };
        assert!(failed(true).is_auth_expired());
        assert!(!failed(false).is_auth_expired());
    }

    #[test]
    fn test_recovery_failed_message() {
        let err = ClientError::RecoveryFailed {
            original: Box::new(ClientError::TokenExpired),
            refresh: Box::new(ClientError::AuthRequired("no cookies".into())),
        };
        assert!(err.to_string().contains("token refresh failed: auth required: no cookies"));
        assert!(!err.is_auth_expired());
        assert!(err.is_auth_failure());
    }
}
