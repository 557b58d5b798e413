//! # Coinsift Features
//!
//! Feature derivation engine: turns one OHLCV series into an
//! index-aligned matrix of nine derived technical columns, then rescales
//! each column independently into `[0, 1]`.
//!
//! Every feature is a pure function of a trailing window, advanced in a
//! single left-to-right pass with explicit accumulators rather than a
//! vectorized math dependency. Features that lack trailing history
//! produce missing values (never zero, never an error); once computed the
//! matrix is forward- then backward-filled, so the finished artifact has
//! no holes. A series shorter than the largest configured window, or one
//! where some column is never computable, fails with
//! [`FeatureError::InsufficientHistory`] and produces nothing partial.
//!
//! Min-max scaling is batch-local by design: parameters are derived from
//! the matrix at hand and never persisted, so values are comparable
//! within one batch but not across batches.

mod config;
mod indicators;
mod matrix;
mod rolling;

pub use config::FeatureConfig;
pub use matrix::{
    FeatureEngine, FeatureError, FeatureMatrix, FeatureRow, NormalizedFeatureMatrix,
    FEATURE_COUNT, FEATURE_NAMES,
};
