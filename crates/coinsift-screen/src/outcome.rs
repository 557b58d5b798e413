use serde::Serialize;
use thiserror::Error;

use coinsift_core::{AgeProof, SourceError, Symbol};

/// Errors that abort a screening run.
///
/// Everything per-symbol is converted into a skip before it reaches the
/// caller; only configuration problems and a failed universe enumeration
/// are fatal.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("invalid screening config: {reason}")]
    Config { reason: String },

    #[error("universe enumeration failed: {0}")]
    UniverseUnavailable(SourceError),
}

impl ScreenError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// One qualifying symbol, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    pub symbol: Symbol,
    pub cap_proxy: f64,
    pub quote_volume: f64,
    pub age: AgeProof,
}

/// A symbol dropped by a provider failure rather than a predicate.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolSkip {
    pub symbol: Symbol,
    pub code: &'static str,
    pub reason: String,
}

impl SymbolSkip {
    pub fn new(symbol: Symbol, error: &SourceError) -> Self {
        Self {
            symbol,
            code: error.code(),
            reason: error.message().to_owned(),
        }
    }
}

/// Collected output of one screening run.
///
/// `results` is ranked ascending by `(cap_proxy, symbol)`; `skips` lists
/// symbols lost to provider failures (predicate filtering is silent).
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    pub results: Vec<ScreeningResult>,
    pub skips: Vec<SymbolSkip>,
    /// Candidates evaluated after the universe was narrowed.
    pub evaluated: usize,
}
