use serde::Serialize;
use thiserror::Error;

use coinsift_core::{BarSeries, Symbol, UtcDateTime};

use crate::indicators::{AdxAccumulator, RsiAccumulator};
use crate::rolling::RollingWindow;
use crate::FeatureConfig;

/// Number of derived feature columns.
pub const FEATURE_COUNT: usize = 9;

/// Derived column names, in output order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "log_return",
    "hl_ratio",
    "volume_ma_ratio",
    "volume_std_ratio",
    "rsi",
    "adx",
    "volatility",
    "bb_position",
    "trend_strength",
];

/// Errors from feature derivation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("invalid feature config: {reason}")]
    InvalidConfig { reason: String },

    #[error("insufficient history for {symbol}: {detail}")]
    InsufficientHistory { symbol: Symbol, detail: String },
}

impl FeatureError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    fn insufficient(symbol: &Symbol, detail: impl Into<String>) -> Self {
        Self::InsufficientHistory {
            symbol: symbol.clone(),
            detail: detail.into(),
        }
    }
}

/// One output row: the source bar plus the derived columns, indexed by
/// [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub features: [f64; FEATURE_COUNT],
}

/// Index-aligned feature matrix for one series, before rescaling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    pub symbol: Symbol,
    pub rows: Vec<FeatureRow>,
}

/// Matrix whose derived columns are rescaled into `[0, 1]`.
///
/// Scaling parameters are batch-local: each column uses its own min/max
/// within this matrix and nothing is persisted for later batches. The
/// same raw value can therefore rescale differently across runs, a
/// known limitation of the per-batch scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedFeatureMatrix {
    pub symbol: Symbol,
    pub rows: Vec<FeatureRow>,
}

impl FeatureMatrix {
    /// Rescale every derived column independently to `[0, 1]` via
    /// `(x - min) / (max - min)`. A zero-range column maps to 0.0
    /// everywhere. OHLCV columns pass through unscaled.
    pub fn normalize(self) -> NormalizedFeatureMatrix {
        let Self { symbol, mut rows } = self;

        for column in 0..FEATURE_COUNT {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for row in &rows {
                min = min.min(row.features[column]);
                max = max.max(row.features[column]);
            }

            let range = max - min;
            for row in &mut rows {
                row.features[column] = if range > 0.0 {
                    (row.features[column] - min) / range
                } else {
                    0.0
                };
            }
        }

        NormalizedFeatureMatrix { symbol, rows }
    }
}

/// Single-pass engine deriving the fixed feature set over one series.
///
/// Every feature is a pure function of a trailing window; all of them are
/// advanced together in one left-to-right sweep, so a series is read
/// exactly once.
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    pub fn new(config: FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Derive the feature matrix for one series.
    ///
    /// Fails with [`FeatureError::InsufficientHistory`] when the series is
    /// shorter than the largest configured window, or when some column has
    /// no computable value anywhere in the batch (a zero-width Bollinger
    /// band throughout, for instance). No partial matrix is produced.
    pub fn derive(&self, series: &BarSeries) -> Result<FeatureMatrix, FeatureError> {
        let required = self.config.max_window();
        if series.len() < required {
            return Err(FeatureError::insufficient(
                &series.symbol,
                format!("{} bars, need at least {required}", series.len()),
            ));
        }

        let cells = self.compute_cells(series);
        let filled = fill_columns(&series.symbol, cells)?;

        let rows = series
            .bars
            .iter()
            .zip(filled)
            .map(|(bar, features)| FeatureRow {
                ts: bar.ts,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                features,
            })
            .collect();

        Ok(FeatureMatrix {
            symbol: series.symbol.clone(),
            rows,
        })
    }

    /// Derive and rescale in one step.
    pub fn derive_normalized(
        &self,
        series: &BarSeries,
    ) -> Result<NormalizedFeatureMatrix, FeatureError> {
        Ok(self.derive(series)?.normalize())
    }

    fn compute_cells(&self, series: &BarSeries) -> Vec<[Option<f64>; FEATURE_COUNT]> {
        let config = &self.config;

        let mut volume_window = RollingWindow::new(config.ma_period);
        let mut pct_change_window = RollingWindow::new(config.volatility_period);
        let mut bb_window = RollingWindow::new(config.bb_period);
        let mut trend_fast_window = RollingWindow::new(config.trend_fast);
        let mut trend_slow_window = RollingWindow::new(config.trend_slow);
        let mut rsi = RsiAccumulator::new(config.rsi_period);
        let mut adx = AdxAccumulator::new(config.adx_period);

        let mut cells = Vec::with_capacity(series.len());
        let mut prev_close: Option<f64> = None;

        for bar in &series.bars {
            volume_window.push(bar.volume);
            bb_window.push(bar.close);
            trend_fast_window.push(bar.close);
            trend_slow_window.push(bar.close);

            let log_return = prev_close.map(|prev| (bar.close / prev).ln());
            if let Some(prev) = prev_close {
                pct_change_window.push(bar.close / prev - 1.0);
            }

            let hl_ratio = Some(bar.high / bar.low);

            // Both volume ratios are undefined over a dead window (zero
            // mean), not a division fault.
            let (volume_ma_ratio, volume_std_ratio) = if volume_window.is_full() {
                let mean = volume_window.mean();
                if mean > 0.0 {
                    (
                        Some(bar.volume / mean),
                        Some(volume_window.sample_std() / mean),
                    )
                } else {
                    (None, None)
                }
            } else {
                (None, None)
            };

            let rsi_value = rsi.push(bar.close);
            let adx_value = adx.push(bar.high, bar.low, bar.close);

            let volatility = if pct_change_window.is_full() {
                Some(pct_change_window.sample_std())
            } else {
                None
            };

            let bb_position = if bb_window.is_full() {
                let mid = bb_window.mean();
                let half_width = config.bb_std * bb_window.population_std();
                let lower = mid - half_width;
                let upper = mid + half_width;
                if upper > lower {
                    Some((bar.close - lower) / (upper - lower))
                } else {
                    // Coinciding bands carry no position information.
                    None
                }
            } else {
                None
            };

            let trend_strength = if trend_fast_window.is_full() && trend_slow_window.is_full() {
                Some(trend_fast_window.mean() - trend_slow_window.mean())
            } else {
                None
            };

            cells.push([
                log_return,
                hl_ratio,
                volume_ma_ratio,
                volume_std_ratio,
                rsi_value,
                adx_value,
                volatility,
                bb_position,
                trend_strength,
            ]);

            prev_close = Some(bar.close);
        }

        cells
    }
}

/// Forward-fill then backward-fill each derived column.
///
/// Returns fully dense rows, or `InsufficientHistory` when a column has no
/// value anywhere in the batch.
fn fill_columns(
    symbol: &Symbol,
    mut cells: Vec<[Option<f64>; FEATURE_COUNT]>,
) -> Result<Vec<[f64; FEATURE_COUNT]>, FeatureError> {
    for column in 0..FEATURE_COUNT {
        let mut last_seen: Option<f64> = None;
        for cell in cells.iter_mut() {
            match cell[column] {
                Some(value) => last_seen = Some(value),
                None => cell[column] = last_seen,
            }
        }

        let mut next_seen: Option<f64> = None;
        for cell in cells.iter_mut().rev() {
            match cell[column] {
                Some(value) => next_seen = Some(value),
                None => cell[column] = next_seen,
            }
        }

        if cells.iter().any(|cell| cell[column].is_none()) {
            return Err(FeatureError::insufficient(
                symbol,
                format!(
                    "column '{}' has no computable value in this batch",
                    FEATURE_NAMES[column]
                ),
            ));
        }
    }

    Ok(cells
        .into_iter()
        .map(|cell| cell.map(|value| value.unwrap_or_default()))
        .collect())
}
