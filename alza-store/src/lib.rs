// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Alza Store
//!
//! On-disk state for the alza client.
//!
//! - **TokenStore**: the `Bearer …` token in `auth_token.txt`
//! - **quickbuy.env**: persisted purchase defaults
//! - **Persistence**: the config directory and owner-only secret files
//!
//! ## Usage
//!
//! ```ignore
//! use alza_store::{TokenStore, load_quickbuy_defaults, quickbuy_env_path};
//!
//! let token = TokenStore::at_default_path()?.load().await?;
//! let defaults = load_quickbuy_defaults(&quickbuy_env_path()?)?;
//! ```

pub mod error;
pub mod persistence;
pub mod quickbuy_env;
pub mod token_store;

pub use error::StoreError;
pub use persistence::{config_dir, ensure_dir, quickbuy_env_path, token_path, write_secret_file};
pub use quickbuy_env::{load_quickbuy_defaults, parse_env_bool};
pub use token_store::TokenStore;
