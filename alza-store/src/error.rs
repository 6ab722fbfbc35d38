//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The token file is absent or empty.
    #[error(
        "failed to read auth token from {}\nRun `alza token refresh` or `alza token pull --from <ssh-host>` first",
        .0.display()
    )]
    TokenMissing(PathBuf),

    /// A defaults file holds a value of the wrong type.
    #[error("invalid {key} in {}: {value:?}", path.display())]
    InvalidValue {
        /// Offending key.
        key: String,
        /// Raw value.
        value: String,
        /// File the value came from.
        path: PathBuf,
    },

    /// A defaults file could not be parsed.
    #[error("failed to parse {}: {source}", path.display())]
    EnvFile {
        /// File being parsed.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: dotenvy::Error,
    },

    /// No home directory to place the config directory in.
    #[error("cannot determine the home directory for the config dir")]
    NoConfigDir,
}
