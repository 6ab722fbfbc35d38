//! Search result types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which endpoint produced a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    /// Primary full-text search.
    #[default]
    Search,
    /// Suggestion ("whisperer") endpoint.
    Whisper,
}

impl SearchSource {
    /// Returns the display name for this source.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Whisper => "whisper",
        }
    }
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A normalized search hit.
///
/// Both search endpoints map into this shape. Fields the producing
/// endpoint does not carry stay empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Product ID.
    pub id: u64,
    /// Product name.
    pub name: String,
    /// Catalog code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    /// Numeric price (0 when unknown).
    pub price: f64,
    /// Formatted price as displayed on the site.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price_text: String,
    /// Availability text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub availability: String,
    /// Image URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    /// Product URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Producing endpoint.
    #[serde(default)]
    pub source: SearchSource,
}
