//! Fetch pipeline for executing strategies in order.
//!
//! Strategies run in insertion order until one produces a usable value.
//! When none does, the leading strategy's own result stands: its value if
//! it returned one (even an unusable one), otherwise its error. Only when
//! every strategy failed is the error a composite of all messages.

use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::error::FetchError;
use crate::strategy::FetchStrategy;

// ============================================================================
// Fetch Attempt
// ============================================================================

/// What happened when a strategy was tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Returned a usable value.
    Usable,
    /// Returned a value the strategy itself considers not good enough.
    Unusable,
    /// Returned an error.
    Failed(String),
    /// Not available for this context.
    Skipped,
}

/// Record of a single fetch attempt.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    /// The strategy ID that was attempted.
    pub strategy_id: String,
    /// Result of the attempt.
    pub status: AttemptStatus,
    /// Whether the failure was a rejected credential (401/403).
    pub auth_required: bool,
    /// How long the attempt took.
    pub duration: Duration,
}

impl FetchAttempt {
    fn new(strategy_id: &str, status: AttemptStatus, duration: Duration) -> Self {
        Self {
            strategy_id: strategy_id.to_string(),
            status,
            auth_required: false,
            duration,
        }
    }

    fn failed(strategy_id: &str, error: &FetchError, duration: Duration) -> Self {
        Self {
            strategy_id: strategy_id.to_string(),
            status: AttemptStatus::Failed(error.to_string()),
            auth_required: error.is_auth_required(),
            duration,
        }
    }

    /// Error message if the attempt failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            AttemptStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The outcome of a fetch pipeline execution.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    /// The result (selected value or final error).
    pub result: Result<T, FetchError>,
    /// Strategy that produced `result` when it is a value.
    pub source: Option<String>,
    /// All attempts made.
    pub attempts: Vec<FetchAttempt>,
    /// Total duration of all attempts.
    pub duration: Duration,
}

impl<T> FetchOutcome<T> {
    /// Returns true if the pipeline produced a value.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of strategies that were tried.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the strategy whose value was selected, if any.
    pub fn successful_strategy(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the error of a specific strategy, if it failed.
    pub fn error_for(&self, strategy_id: &str) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| a.strategy_id == strategy_id)
            .and_then(FetchAttempt::error)
    }

    /// Returns true if any attempt failed on rejected credentials.
    pub fn auth_failed(&self) -> bool {
        self.attempts.iter().any(|a| a.auth_required)
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts.iter().filter_map(FetchAttempt::error).collect()
    }
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

/// An ordered chain of strategies producing the same kind of value.
pub struct FetchPipeline<C: Sync + ?Sized, T: Send> {
    strategies: Vec<Box<dyn FetchStrategy<C, T>>>,
}

impl<C: Sync + ?Sized, T: Send> FetchPipeline<C, T> {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Creates a pipeline with the given strategies, tried in this order.
    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy<C, T>>>) -> Self {
        Self { strategies }
    }

    /// Returns the number of strategies in the pipeline.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Execute the pipeline.
    #[instrument(skip(self, ctx), fields(strategies = self.strategies.len()))]
    pub async fn execute(&self, ctx: &C) -> FetchOutcome<T> {
        let start = Instant::now();
        let mut attempts = Vec::new();

        if self.strategies.is_empty() {
            return FetchOutcome {
                result: Err(FetchError::StrategyNotAvailable(
                    "No strategies configured".to_string(),
                )),
                source: None,
                attempts,
                duration: start.elapsed(),
            };
        }

        info!(count = self.strategies.len(), "Executing fetch pipeline");

        // Result of the first strategy that actually ran.
        let mut lead: Option<(String, Result<T, FetchError>)> = None;

        for strategy in &self.strategies {
            let strategy_id = strategy.id();

            if !strategy.is_available(ctx).await {
                debug!(strategy = %strategy_id, "Strategy not available, skipping");
                attempts.push(FetchAttempt::new(
                    strategy_id,
                    AttemptStatus::Skipped,
                    Duration::ZERO,
                ));
                continue;
            }

            let attempt_start = Instant::now();
            debug!(strategy = %strategy_id, "Executing strategy");

            match strategy.fetch(ctx).await {
                Ok(value) if strategy.is_usable(&value) => {
                    let duration = attempt_start.elapsed();
                    info!(strategy = %strategy_id, duration = ?duration, "Strategy succeeded");
                    attempts.push(FetchAttempt::new(
                        strategy_id,
                        AttemptStatus::Usable,
                        duration,
                    ));

                    return FetchOutcome {
                        result: Ok(value),
                        source: Some(strategy_id.to_string()),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Ok(value) => {
                    let duration = attempt_start.elapsed();
                    debug!(strategy = %strategy_id, "Strategy returned an unusable value");
                    attempts.push(FetchAttempt::new(
                        strategy_id,
                        AttemptStatus::Unusable,
                        duration,
                    ));
                    if lead.is_none() {
                        lead = Some((strategy_id.to_string(), Ok(value)));
                    }
                }
                Err(error) => {
                    let duration = attempt_start.elapsed();
                    warn!(
                        strategy = %strategy_id,
                        error = %error,
                        duration = ?duration,
                        "Strategy failed"
                    );
                    attempts.push(FetchAttempt::failed(strategy_id, &error, duration));

                    if !strategy.should_fallback(&error) {
                        debug!(strategy = %strategy_id, "Strategy indicates no fallback");
                        return FetchOutcome {
                            result: Err(error),
                            source: None,
                            attempts,
                            duration: start.elapsed(),
                        };
                    }
                    if lead.is_none() {
                        lead = Some((strategy_id.to_string(), Err(error)));
                    }
                }
            }
        }

        let failures: Vec<String> = attempts
            .iter()
            .filter_map(|a| a.error().map(|e| format!("{}: {e}", a.strategy_id)))
            .collect();
        let ran = attempts
            .iter()
            .filter(|a| a.status != AttemptStatus::Skipped)
            .count();

        let (source, result) = match lead {
            None => (
                None,
                Err(FetchError::StrategyNotAvailable(
                    "No available strategies".to_string(),
                )),
            ),
            Some((_, Err(_))) if ran > 1 && failures.len() == ran => {
                warn!("All strategies failed");
                (None, Err(FetchError::AllStrategiesFailed(failures)))
            }
            Some((id, Ok(value))) => (Some(id), Ok(value)),
            Some((_, Err(error))) => (None, Err(error)),
        };

        FetchOutcome {
            result,
            source,
            attempts,
            duration: start.elapsed(),
        }
    }
}

impl<C: Sync + ?Sized, T: Send> Default for FetchPipeline<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed {
        id: &'static str,
        values: Option<Vec<u32>>,
        available: bool,
        fallback: bool,
        rejected: bool,
    }

    impl Fixed {
        fn ok(id: &'static str, values: Vec<u32>) -> Self {
            Self {
                id,
                values: Some(values),
                available: true,
                fallback: true,
                rejected: false,
            }
        }

        fn failing(id: &'static str) -> Self {
            Self {
                id,
                values: None,
                available: true,
                fallback: true,
                rejected: false,
            }
        }

        fn rejecting(id: &'static str) -> Self {
            Self {
                rejected: true,
                ..Self::failing(id)
            }
        }

        fn unavailable(mut self) -> Self {
            self.available = false;
            self
        }

        fn no_fallback(mut self) -> Self {
            self.fallback = false;
            self
        }
    }

    #[async_trait]
    impl FetchStrategy<(), Vec<u32>> for Fixed {
        fn id(&self) -> &str {
            self.id
        }

        async fn is_available(&self, _ctx: &()) -> bool {
            self.available
        }

        async fn fetch(&self, _ctx: &()) -> Result<Vec<u32>, FetchError> {
            if self.rejected {
                return Err(FetchError::AuthRequired {
                    status: 403,
                    url: format!("https://www.alza.sk/{}", self.id),
                    body: String::new(),
                });
            }
            self.values
                .clone()
                .ok_or_else(|| FetchError::StrategyNotAvailable(format!("{} broke", self.id)))
        }

        fn is_usable(&self, value: &Vec<u32>) -> bool {
            !value.is_empty()
        }

        fn should_fallback(&self, _error: &FetchError) -> bool {
            self.fallback
        }
    }

    fn pipeline(strategies: Vec<Fixed>) -> FetchPipeline<(), Vec<u32>> {
        FetchPipeline::with_strategies(
            strategies
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn FetchStrategy<(), Vec<u32>>>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let outcome = pipeline(vec![]).execute(&()).await;
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome.result,
            Err(FetchError::StrategyNotAvailable(_))
        ));
    }

    #[tokio::test]
    async fn test_first_usable_wins() {
        let outcome = pipeline(vec![Fixed::ok("a", vec![1]), Fixed::ok("b", vec![2])])
            .execute(&())
            .await;
        assert_eq!(outcome.result.as_ref().unwrap(), &vec![1]);
        assert_eq!(outcome.attempts_count(), 1);
    }

    #[tokio::test]
    async fn test_unusable_lead_falls_through_to_usable() {
        let outcome = pipeline(vec![Fixed::ok("a", vec![]), Fixed::ok("b", vec![7])])
            .execute(&())
            .await;
        assert_eq!(outcome.successful_strategy(), Some("b"));
        assert_eq!(outcome.result.unwrap(), vec![7]);
        assert_eq!(outcome.attempts[0].status, AttemptStatus::Unusable);
    }

    #[tokio::test]
    async fn test_unusable_lead_kept_when_fallback_fails() {
        let outcome = pipeline(vec![Fixed::ok("a", vec![]), Fixed::failing("b")])
            .execute(&())
            .await;
        assert_eq!(outcome.successful_strategy(), Some("a"));
        assert!(outcome.result.as_ref().unwrap().is_empty());
        assert!(outcome.error_for("b").is_some());
    }

    #[tokio::test]
    async fn test_failed_lead_error_kept_when_fallback_unusable() {
        let outcome = pipeline(vec![Fixed::failing("a"), Fixed::ok("b", vec![])])
            .execute(&())
            .await;
        let err = outcome.result.unwrap_err();
        assert_eq!(err.to_string(), "Strategy not available: a broke");
    }

    #[tokio::test]
    async fn test_all_failed_is_composite() {
        let outcome = pipeline(vec![Fixed::failing("a"), Fixed::failing("b")])
            .execute(&())
            .await;
        match &outcome.result {
            Err(FetchError::AllStrategiesFailed(messages)) => {
                assert_eq!(messages.len(), 2);
                assert!(messages[0].starts_with("a: "));
                assert!(messages[1].starts_with("b: "));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(outcome.errors().len(), 2);
    }

    #[tokio::test]
    async fn test_auth_failure_recorded_on_attempt() {
        let outcome = pipeline(vec![Fixed::failing("a"), Fixed::rejecting("b")])
            .execute(&())
            .await;
        assert!(matches!(
            outcome.result,
            Err(FetchError::AllStrategiesFailed(_))
        ));
        assert!(!outcome.attempts[0].auth_required);
        assert!(outcome.attempts[1].auth_required);
        assert!(outcome.auth_failed());
    }

    #[tokio::test]
    async fn test_unusable_lead_kept_when_fallback_rejected() {
        let outcome = pipeline(vec![Fixed::ok("a", vec![]), Fixed::rejecting("b")])
            .execute(&())
            .await;
        assert!(outcome.result.as_ref().unwrap().is_empty());
        assert!(outcome.auth_failed());
    }

    #[tokio::test]
    async fn test_no_fallback_stops_pipeline() {
        let outcome = pipeline(vec![
            Fixed::failing("a").no_fallback(),
            Fixed::ok("b", vec![1]),
        ])
        .execute(&())
        .await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts_count(), 1);
    }

    #[tokio::test]
    async fn test_skip_unavailable() {
        let outcome = pipeline(vec![
            Fixed::ok("a", vec![1]).unavailable(),
            Fixed::ok("b", vec![2]),
        ])
        .execute(&())
        .await;
        assert_eq!(outcome.successful_strategy(), Some("b"));
        assert_eq!(outcome.attempts[0].status, AttemptStatus::Skipped);
    }
}
