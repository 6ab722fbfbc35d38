//! Core error types.

use thiserror::Error;

/// Core error type for model validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Purchase configuration is missing required fields.
    ///
    /// Fields are named by the environment keys that set them, so the
    /// message can be acted on directly.
    #[error("quickbuy config missing: {}", missing.join(", "))]
    Validation {
        /// Every missing field, in declaration order.
        missing: Vec<&'static str>,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from an API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl CoreError {
    /// Returns the missing field names for a validation error.
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::Validation { missing } => missing,
            _ => &[],
        }
    }
}
