//! The shop client.
//!
//! [`ShopClient`] owns the transport and knows the two hosts the API is
//! spread over. It holds no per-user state; that lives in [`Session`],
//! which every operation takes explicitly.

use alza_fetch::{ApiResponse, HttpClient};
use alza_store::TokenStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::endpoints::WHISPER_BASE_URL;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Client for the shop API.
#[derive(Debug, Clone)]
pub struct ShopClient {
    http: HttpClient,
    whisper_base: String,
}

impl ShopClient {
    /// Creates a client for the live shop.
    pub fn new() -> ClientResult<Self> {
        Ok(Self::with_http(HttpClient::new()?))
    }

    /// Creates a client over an existing transport.
    ///
    /// The whisperer host defaults to the live one; tests point it at
    /// their mock server with [`ShopClient::with_whisper_base`].
    pub fn with_http(http: HttpClient) -> Self {
        Self {
            http,
            whisper_base: WHISPER_BASE_URL.to_string(),
        }
    }

    /// Overrides the whisperer host.
    #[must_use]
    pub fn with_whisper_base(mut self, base: impl Into<String>) -> Self {
        self.whisper_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// The underlying transport.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The whisperer host.
    pub fn whisper_base(&self) -> &str {
        &self.whisper_base
    }

    /// Loads the stored token and validates it against the API.
    ///
    /// An expired token fails here, before any operation runs.
    #[instrument(skip(self, store), fields(path = %store.path().display()))]
    pub async fn open_session(&self, store: &TokenStore) -> ClientResult<Session> {
        let token = store.load().await?;
        let mut session = Session::new(token);
        self.validate_session(&mut session).await?;
        debug!(user_id = %session.user_id(), "Session validated");
        Ok(session)
    }

    // ========================================================================
    // Request helpers
    // ========================================================================

    pub(crate) async fn get(&self, session: &Session, target: &str) -> ClientResult<ApiResponse> {
        Ok(self.http.get(target, auth(session)).await?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        target: &str,
        context: &'static str,
    ) -> ClientResult<T> {
        let response = self.get(session, target).await?;
        decode(&response, context)
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        target: &str,
        body: &B,
    ) -> ClientResult<ApiResponse> {
        Ok(self.http.post_json(target, auth(session), body).await?)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        session: &Session,
        target: &str,
        body: &B,
        context: &'static str,
    ) -> ClientResult<T> {
        let response = self.post(session, target, body).await?;
        decode(&response, context)
    }

    pub(crate) async fn delete(&self, session: &Session, target: &str) -> ClientResult<ApiResponse> {
        Ok(self.http.delete(target, auth(session)).await?)
    }
}

/// The `Authorization` value for a session, `None` when it has no token.
pub(crate) fn auth(session: &Session) -> Option<&str> {
    Some(session.auth_token()).filter(|token| !token.is_empty())
}

/// Decodes a response body, tagging failures with `context`.
pub(crate) fn decode<T: DeserializeOwned>(
    response: &ApiResponse,
    context: &'static str,
) -> ClientResult<T> {
    serde_json::from_str(&response.body).map_err(|source| ClientError::parse(context, source))
}
