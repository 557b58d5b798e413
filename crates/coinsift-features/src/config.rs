use crate::FeatureError;

/// Trailing-window parameters for the derived feature set.
#[derive(Debug, Clone, Copy)]
pub struct FeatureConfig {
    pub rsi_period: usize,
    pub adx_period: usize,
    /// Window for the volume moving average and dispersion ratio.
    pub ma_period: usize,
    pub bb_period: usize,
    /// Band width in standard deviations.
    pub bb_std: f64,
    pub volatility_period: usize,
    /// Fast leg of the trend-strength moving-average pair.
    pub trend_fast: usize,
    /// Slow leg; trend strength is undefined until this many bars exist.
    pub trend_slow: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            adx_period: 14,
            ma_period: 20,
            bb_period: 20,
            bb_std: 2.0,
            volatility_period: 14,
            trend_fast: 50,
            trend_slow: 200,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), FeatureError> {
        let windows = [
            ("rsi_period", self.rsi_period),
            ("adx_period", self.adx_period),
            ("ma_period", self.ma_period),
            ("bb_period", self.bb_period),
            ("volatility_period", self.volatility_period),
            ("trend_fast", self.trend_fast),
            ("trend_slow", self.trend_slow),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(FeatureError::invalid_config(format!(
                    "window parameter '{name}' must be at least 1"
                )));
            }
        }
        if !self.bb_std.is_finite() || self.bb_std <= 0.0 {
            return Err(FeatureError::invalid_config(
                "bb_std must be a positive number",
            ));
        }
        if self.trend_fast > self.trend_slow {
            return Err(FeatureError::invalid_config(
                "trend_fast must not exceed trend_slow",
            ));
        }
        Ok(())
    }

    /// Bars required before every feature has had a chance to produce at
    /// least one value.
    ///
    /// RSI and volatility consume differences, so they need one bar more
    /// than their period; ADX needs a full period of smoothed DX values on
    /// top of its smoothing warm-up.
    pub fn max_window(&self) -> usize {
        [
            self.rsi_period + 1,
            2 * self.adx_period,
            self.ma_period,
            self.bb_period,
            self.volatility_period + 1,
            self.trend_slow,
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }
}
