// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Alza Fetch
//!
//! Transport layer for the alza client.
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client that speaks to the shop with browser-like
//!   headers and classifies failing statuses into [`FetchError`]
//! - [`host::browser`] - Browser cookie import, used to mint fresh tokens
//!
//! ## Fetch Pipeline
//!
//! - [`strategy::FetchStrategy`] - One way of producing a value
//! - [`pipeline::FetchPipeline`] - Tries strategies in order until one
//!   produces a usable value
//!
//! ## Example
//!
//! ```ignore
//! use alza_fetch::{FetchPipeline, HttpClient};
//!
//! let http = HttpClient::new()?;
//! let pipeline = FetchPipeline::with_strategies(vec![
//!     Box::new(PrimarySearch),
//!     Box::new(WhisperSearch),
//! ]);
//! let outcome = pipeline.execute(&query).await;
//! ```

pub mod error;
pub mod host;
pub mod pipeline;
pub mod strategy;

pub use error::{BrowserError, FetchError};

pub use host::{
    ApiResponse, Browser, BrowserCookieImporter, Cookie, CookieQuery, DEFAULT_BASE_URL, HttpClient,
    headers::user_agent,
};

pub use pipeline::{AttemptStatus, FetchAttempt, FetchOutcome, FetchPipeline};
pub use strategy::FetchStrategy;
