//! # Coinsift Screen
//!
//! Concurrent screening engine: evaluates every pair in the trading
//! universe against a cap-proxy ceiling, a quote-volume floor, and a
//! minimum listing age, then ranks the survivors.
//!
//! Evaluation is embarrassingly parallel and runs on a bounded worker
//! pool ([`ScreenConfig::concurrency`]) so the upstream rate limit is the
//! only shared resource. Per-symbol provider failures never abort the
//! run: rate-limited and transient errors are retried with jittered
//! bounded backoff, everything else becomes a skip-with-reason in the
//! [`ScreenReport`].
//!
//! Listing age uses the venue onboarding time when available and falls
//! back to counting observed daily bars otherwise; the bar count is an
//! approximation, since a pair can predate its first retrievable bar.

mod config;
mod engine;
mod outcome;

pub use config::ScreenConfig;
pub use engine::{screen, ScreeningEngine};
pub use outcome::{ScreenError, ScreenReport, ScreeningResult, SymbolSkip};
