//! Fetch strategy trait.
//!
//! A strategy is one way of obtaining a value of type `T` given a context
//! `C`. Several strategies for the same value (a structured endpoint, a
//! suggestion endpoint, ...) are chained by a [`FetchPipeline`] and tried in
//! the order they were added.
//!
//! [`FetchPipeline`]: crate::pipeline::FetchPipeline

use async_trait::async_trait;

use crate::error::FetchError;

// ============================================================================
// Fetch Strategy Trait
// ============================================================================

/// A strategy for fetching a `T` using context `C`.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct PrimarySearch;
///
/// #[async_trait]
/// impl FetchStrategy<SearchQuery<'_>, Vec<SearchResult>> for PrimarySearch {
///     fn id(&self) -> &str {
///         "search"
///     }
///
///     async fn fetch(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchResult>, FetchError> {
///         // POST the search endpoint and map the rows
///     }
///
///     fn is_usable(&self, results: &Vec<SearchResult>) -> bool {
///         !results.is_empty()
///     }
/// }
/// ```
#[async_trait]
pub trait FetchStrategy<C, T>: Send + Sync
where
    C: Sync + ?Sized,
    T: Send,
{
    /// Identifier used in logs and attempt records.
    fn id(&self) -> &str;

    /// Check if this strategy can run at all with this context.
    ///
    /// Should be a quick local check, not a network call.
    async fn is_available(&self, _ctx: &C) -> bool {
        true
    }

    /// Fetch the value.
    async fn fetch(&self, ctx: &C) -> Result<T, FetchError>;

    /// Whether a successfully fetched value is good enough to stop the
    /// pipeline. An unusable value lets the next strategy run.
    fn is_usable(&self, _value: &T) -> bool {
        true
    }

    /// Whether to try the next strategy if this one fails with the given error.
    ///
    /// Auth failures stop the pipeline by default: the next strategy would
    /// use the same credentials.
    fn should_fallback(&self, error: &FetchError) -> bool {
        !error.is_auth_required()
    }
}

// ============================================================================
// Tests
// ============================================================================
