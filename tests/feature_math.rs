//! Mathematical correctness tests for the feature derivation engine,
//! exercised through its public contract on constructed series.

use coinsift_features::{FeatureConfig, FeatureEngine, FeatureError, FEATURE_NAMES};
use coinsift_tests::*;

/// Small windows keep hand-computation tractable.
fn small_config() -> FeatureConfig {
    FeatureConfig {
        rsi_period: 3,
        adx_period: 3,
        ma_period: 4,
        bb_period: 4,
        bb_std: 2.0,
        volatility_period: 3,
        trend_fast: 4,
        trend_slow: 8,
    }
}

fn column(name: &str) -> usize {
    FEATURE_NAMES
        .iter()
        .position(|&candidate| candidate == name)
        .expect("known feature name")
}

/// Closes growing 1% per bar: constant log-return and percent change.
fn geometric_series(raw_symbol: &str, len: usize) -> BarSeries {
    let closes: Vec<f64> = (0..len).map(|index| 10.0 * 1.01_f64.powi(index as i32)).collect();
    series_from_closes(raw_symbol, &closes)
}

// =============================================================================
// Row alignment and failure modes
// =============================================================================

#[test]
fn output_rows_match_input_bars_one_to_one() {
    let series = geometric_series("ABCUSDT", 64);
    let engine = FeatureEngine::new(small_config()).expect("engine");

    let matrix = engine.derive(&series).expect("matrix");

    assert_eq!(matrix.rows.len(), series.len());
    for (bar, row) in series.bars.iter().zip(&matrix.rows) {
        assert_eq!(bar.ts, row.ts);
    }
}

#[test]
fn series_shorter_than_largest_window_is_refused_outright() {
    // Largest window in the small config is the 8-bar slow trend leg
    let series = geometric_series("ABCUSDT", 7);
    let engine = FeatureEngine::new(small_config()).expect("engine");

    let err = engine.derive(&series).expect_err("must fail");
    assert!(matches!(err, FeatureError::InsufficientHistory { .. }));
}

#[test]
fn zero_window_parameter_is_a_fatal_config_error() {
    let config = FeatureConfig {
        ma_period: 0,
        ..FeatureConfig::default()
    };
    let err = FeatureEngine::new(config).expect_err("must fail");
    assert!(matches!(err, FeatureError::InvalidConfig { .. }));
}

// =============================================================================
// Hand-checked feature values (unnormalized)
// =============================================================================

#[test]
fn log_return_of_geometric_closes_is_constant() {
    let series = geometric_series("ABCUSDT", 32);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    let expected = 1.01_f64.ln();
    let log_return = column("log_return");
    for row in &matrix.rows {
        assert!(
            (row.features[log_return] - expected).abs() < 1e-12,
            "log_return={}",
            row.features[log_return]
        );
    }
}

#[test]
fn hl_ratio_reflects_bar_geometry() {
    let series = geometric_series("ABCUSDT", 32);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    // Fixture bars always carry high = close * 1.02, low = close * 0.98
    let expected = 1.02 / 0.98;
    let hl_ratio = column("hl_ratio");
    for row in &matrix.rows {
        assert!((row.features[hl_ratio] - expected).abs() < 1e-12);
    }
}

#[test]
fn constant_percent_change_has_zero_rolling_volatility() {
    let series = geometric_series("ABCUSDT", 32);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    let volatility = column("volatility");
    for row in &matrix.rows {
        assert!(row.features[volatility].abs() < 1e-12);
    }
}

#[test]
fn constant_volume_pins_both_volume_ratios() {
    let closes: Vec<f64> = (0..32).map(|index| 10.0 + (index as f64 * 0.9).sin()).collect();
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(index, &close)| bar_at(index, close, 500.0))
        .collect();
    let series = BarSeries::new(symbol("ABCUSDT"), Interval::FiveMinutes, bars).expect("series");

    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    let ma_ratio = column("volume_ma_ratio");
    let std_ratio = column("volume_std_ratio");
    for row in &matrix.rows {
        assert!((row.features[ma_ratio] - 1.0).abs() < 1e-12);
        assert!(row.features[std_ratio].abs() < 1e-12);
    }
}

#[test]
fn monotonic_rally_saturates_rsi() {
    let series = geometric_series("ABCUSDT", 32);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    // No losing bars anywhere: every defined RSI reads 100, and the fill
    // propagates that to the warm-up rows.
    let rsi = column("rsi");
    for row in &matrix.rows {
        assert_eq!(row.features[rsi], 100.0);
    }
}

#[test]
fn sustained_trend_produces_high_adx_and_positive_trend_strength() {
    let series = geometric_series("ABCUSDT", 64);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    let adx = column("adx");
    let trend = column("trend_strength");
    let last = matrix.rows.last().expect("rows");
    assert!(last.features[adx] > 50.0, "adx={}", last.features[adx]);
    assert!(last.features[adx] <= 100.0);
    // Fast average above slow average in a rising market
    assert!(last.features[trend] > 0.0);
}

#[test]
fn trend_strength_matches_moving_average_difference() {
    let series = geometric_series("ABCUSDT", 24);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    let closes: Vec<f64> = series.bars.iter().map(|bar| bar.close).collect();
    let last = closes.len() - 1;
    let fast: f64 = closes[last + 1 - 4..].iter().sum::<f64>() / 4.0;
    let slow: f64 = closes[last + 1 - 8..].iter().sum::<f64>() / 8.0;

    let trend = column("trend_strength");
    let actual = matrix.rows[last].features[trend];
    assert!((actual - (fast - slow)).abs() < 1e-9, "trend={actual}");
}

#[test]
fn bollinger_position_tracks_close_against_the_band() {
    let series = geometric_series("ABCUSDT", 24);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    let closes: Vec<f64> = series.bars.iter().map(|bar| bar.close).collect();
    let last = closes.len() - 1;
    let window = &closes[last + 1 - 4..];
    let mean: f64 = window.iter().sum::<f64>() / 4.0;
    let variance: f64 = window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / 4.0;
    let half_width = 2.0 * variance.sqrt();
    let expected = (closes[last] - (mean - half_width)) / (2.0 * half_width);

    let bb = column("bb_position");
    let actual = matrix.rows[last].features[bb];
    assert!((actual - expected).abs() < 1e-9, "bb_position={actual}");
}

// =============================================================================
// Fill and normalization
// =============================================================================

#[test]
fn warm_up_rows_are_filled_never_zeroed() {
    let series = geometric_series("ABCUSDT", 32);
    let engine = FeatureEngine::new(small_config()).expect("engine");
    let matrix = engine.derive(&series).expect("matrix");

    // The slow trend leg is first defined at index 7; earlier rows carry
    // that first value backward instead of a zero placeholder.
    let trend = column("trend_strength");
    let first_defined = matrix.rows[7].features[trend];
    for row in &matrix.rows[..7] {
        assert_eq!(row.features[trend], first_defined);
    }
}

#[test]
fn every_normalized_cell_is_within_the_unit_interval() {
    let closes = trending_closes(240);
    let series = series_from_closes("ABCUSDT", &closes);
    let engine = FeatureEngine::new(FeatureConfig::default()).expect("engine");

    let matrix = engine.derive_normalized(&series).expect("matrix");

    for row in &matrix.rows {
        for (index, value) in row.features.iter().enumerate() {
            assert!(
                (0.0..=1.0).contains(value),
                "{} out of range: {value}",
                FEATURE_NAMES[index]
            );
        }
    }
}

#[test]
fn renormalizing_a_normalized_matrix_changes_nothing() {
    let closes = trending_closes(240);
    let series = series_from_closes("ABCUSDT", &closes);
    let engine = FeatureEngine::new(FeatureConfig::default()).expect("engine");

    let normalized = engine.derive_normalized(&series).expect("matrix");
    let renormalized = coinsift_features::FeatureMatrix {
        symbol: normalized.symbol.clone(),
        rows: normalized.rows.clone(),
    }
    .normalize();

    for (a, b) in normalized.rows.iter().zip(&renormalized.rows) {
        for (x, y) in a.features.iter().zip(&b.features) {
            assert!((x - y).abs() < 1e-9);
        }
    }
}

#[test]
fn normalization_leaves_ohlcv_untouched() {
    let closes = trending_closes(240);
    let series = series_from_closes("ABCUSDT", &closes);
    let engine = FeatureEngine::new(FeatureConfig::default()).expect("engine");

    let matrix = engine.derive_normalized(&series).expect("matrix");

    for (bar, row) in series.bars.iter().zip(&matrix.rows) {
        assert_eq!(bar.open, row.open);
        assert_eq!(bar.high, row.high);
        assert_eq!(bar.low, row.low);
        assert_eq!(bar.close, row.close);
        assert_eq!(bar.volume, row.volume);
    }
}
