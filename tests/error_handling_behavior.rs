//! Behavior-driven tests for the error taxonomy: what is retried, what
//! becomes a per-symbol skip, and what is allowed to abort a run.

use std::time::Duration;

use coinsift_core::{call_with_retry, RetryConfig};
use coinsift_features::{FeatureConfig, FeatureEngine, FeatureError};
use coinsift_screen::{screen, ScreenConfig, ScreenError, ScreeningEngine};
use coinsift_tests::*;

// =============================================================================
// Taxonomy invariants
// =============================================================================

#[test]
fn only_rate_limited_and_transient_errors_are_retryable() {
    assert!(SourceError::rate_limited("slow down").retryable());
    assert!(SourceError::transient("reset").retryable());
    assert!(!SourceError::data_unavailable("gone").retryable());
    assert!(!SourceError::malformed_bar("high < low").retryable());
    assert!(!SourceError::invalid_request("bad params").retryable());
    assert!(!SourceError::internal("bug").retryable());
}

#[test]
fn error_codes_are_stable_identifiers() {
    assert_eq!(SourceError::rate_limited("x").code(), "source.rate_limited");
    assert_eq!(SourceError::transient("x").code(), "source.transient");
    assert_eq!(
        SourceError::data_unavailable("x").code(),
        "source.data_unavailable"
    );
    assert_eq!(SourceError::malformed_bar("x").code(), "source.malformed_bar");
}

#[test]
fn zero_limit_kline_request_is_rejected_with_clear_message() {
    let result = KlinesRequest::new(symbol("ABCUSDT"), Interval::OneDay, 0, None);

    let error = result.expect_err("zero limit should fail");
    assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
    assert!(
        error.message().to_lowercase().contains("limit"),
        "error should mention the limit parameter"
    );
}

// =============================================================================
// Retry helper
// =============================================================================

#[tokio::test]
async fn retry_helper_gives_up_after_the_configured_budget() {
    let mut attempts = 0;
    let result: Result<(), _> = call_with_retry(
        RetryConfig::fixed(Duration::from_millis(1), 2),
        || {
            attempts += 1;
            async { Err(SourceError::rate_limited("always throttled")) }
        },
    )
    .await;

    let error = result.expect_err("budget exhausted");
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert_eq!(attempts, 3, "one initial attempt plus two retries");
}

#[tokio::test]
async fn retry_helper_passes_terminal_errors_through_untouched() {
    let mut attempts = 0;
    let result: Result<(), _> = call_with_retry(
        RetryConfig::fixed(Duration::from_millis(1), 5),
        || {
            attempts += 1;
            async { Err(SourceError::invalid_request("no such symbol")) }
        },
    )
    .await;

    assert!(result.is_err());
    assert_eq!(attempts, 1);
}

// =============================================================================
// Fatal versus per-symbol failures
// =============================================================================

#[tokio::test]
async fn failed_universe_enumeration_aborts_the_whole_run() {
    let market = ScriptedMarket::new()
        .with_failed_universe(SourceError::transient("exchange info unreachable"));

    let err = screen(Arc::new(market), ScreenConfig::default())
        .await
        .expect_err("must fail");

    assert!(matches!(err, ScreenError::UniverseUnavailable(_)));
}

#[tokio::test]
async fn zero_worker_pool_width_is_rejected_before_any_network_call() {
    let market = Arc::new(ScriptedMarket::new().with_entry("AAAUSDT"));
    let config = ScreenConfig {
        concurrency: 0,
        ..ScreenConfig::default()
    };

    let err = ScreeningEngine::new(market.clone(), config).err();
    assert!(matches!(err, Some(ScreenError::Config { .. })));
    assert_eq!(
        market.quote_calls.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[test]
fn zero_indicator_window_is_rejected_at_engine_construction() {
    let config = FeatureConfig {
        volatility_period: 0,
        ..FeatureConfig::default()
    };
    let err = FeatureEngine::new(config).expect_err("must fail");
    assert!(matches!(err, FeatureError::InvalidConfig { .. }));
}

#[tokio::test]
async fn malformed_kline_history_skips_the_symbol_and_spares_the_batch() {
    // Given: one pair whose kline history violates bar consistency
    let market = ScriptedMarket::new()
        .with_entry("BADUSDT")
        .with_entry("OKUSDT")
        .with_quote("BADUSDT", 1.0, 50_000_000.0)
        .with_quote("OKUSDT", 1.0, 60_000_000.0)
        .with_series_failure("BADUSDT", SourceError::malformed_bar("bar high below low"))
        .with_daily_history("OKUSDT", 60);

    let config = ScreenConfig {
        min_age_days: 30,
        retry: RetryConfig::no_retry(),
        ..ScreenConfig::default()
    };

    // When: the run needs kline history for the age proof
    let report = screen(Arc::new(market), config)
        .await
        .expect("screening run completes");

    // Then: the malformed symbol is a skip, the healthy one qualifies
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].symbol.as_str(), "OKUSDT");
    assert_eq!(report.skips.len(), 1);
    assert_eq!(report.skips[0].code, "source.malformed_bar");
}

#[test]
fn insufficient_history_never_yields_a_partial_matrix() {
    let series = series_from_closes("SHRTUSDT", &trending_closes(50));
    let engine = FeatureEngine::new(FeatureConfig::default()).expect("engine");

    let result = engine.derive(&series);

    match result {
        Err(FeatureError::InsufficientHistory { .. }) => {}
        other => panic!("expected insufficient history, got {other:?}"),
    }
}
