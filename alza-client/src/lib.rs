// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Alza Client
//!
//! Operations against the alza.sk shop API.
//!
//! Every operation is a method on [`ShopClient`] that takes a [`Session`].
//! The session caches the user ID and basket ID once resolved, so one
//! command costs as few identity round trips as possible.
//!
//! ## Operations
//!
//! | Area | Module | Notes |
//! |------|--------|-------|
//! | Identity | [`identity`] | user ID, basket ID, status summary |
//! | Cart | [`cart`] | listing reconciled with the preview, add/remove/clear |
//! | Search | [`search`] | primary search with whisperer fallback |
//! | Quick buy | [`quickbuy`] | quote, commit, pay |
//! | Orders | [`orders`] | active and archived orders |
//! | Lists | [`lists`] | lists and favorites |
//! | Product | [`product`] | detail, availability, description |
//! | Token | [`token`] | cookie to bearer token exchange |
//!
//! [`recovery::AuthRecovery`] wraps any of these and retries once after
//! refreshing an expired token.
//!
//! ## Usage
//!
//! ```ignore
//! use alza_client::{AuthRecovery, CookieTokenRefresher, ShopClient};
//! use alza_fetch::CookieQuery;
//! use alza_store::TokenStore;
//!
//! let client = ShopClient::new()?;
//! let store = TokenStore::at_default_path()?;
//! let recovery = AuthRecovery::new(CookieTokenRefresher::new(
//!     client.clone(),
//!     store.clone(),
//!     CookieQuery::new("alza.sk"),
//! ));
//!
//! let cart = recovery
//!     .run(|| async {
//!         let mut session = client.open_session(&store).await?;
//!         client.get_cart(&mut session).await
//!     })
//!     .await?;
//! ```

pub mod cart;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod identity;
pub mod lists;
pub mod orders;
pub mod product;
pub mod quickbuy;
pub mod recovery;
pub mod search;
pub mod session;
pub mod token;

pub use cart::{CartLine, PreviewItem, reconcile};
pub use client::ShopClient;
pub use error::{ClientError, ClientResult, TOKEN_EXPIRED_MARKER};
pub use lists::{DEFAULT_FAVORITES_NAMES, select_favorites_list};
pub use orders::DEFAULT_ORDER_LIMIT;
pub use product::extract_description;
pub use quickbuy::{FastOrderOptions, Stage};
pub use recovery::{AuthRecovery, COOKIE_DOMAIN, CookieTokenRefresher, CredentialRefresher};
pub use search::{PrimarySearch, SearchQuery, WhisperSearch};
pub use session::{Basket, Session};
pub use token::{BEARER_PREFIX, exchange_cookies_for_token, extract_bearer_line};
