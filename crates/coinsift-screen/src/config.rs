use coinsift_core::RetryConfig;

use crate::ScreenError;

/// Thresholds and resource limits for one screening run.
///
/// `cap_threshold` is an upper bound (strictly under), `min_quote_volume`
/// and `min_age_days` are lower bounds. All three predicates must hold for
/// a symbol to qualify.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Settlement asset the universe is narrowed to before any
    /// per-symbol calls.
    pub quote_asset: String,
    /// Cap-proxy ceiling; symbols at or above it are filtered out.
    pub cap_threshold: f64,
    /// 24h quote-volume floor.
    pub min_quote_volume: f64,
    /// Minimum listing age in days (or observed daily bars).
    pub min_age_days: u32,
    /// Keep only the first K ranked survivors; `None` keeps all.
    pub top_k: Option<usize>,
    /// Worker-pool width for per-symbol evaluation.
    pub concurrency: usize,
    /// Retry budget for rate-limited/transient provider failures.
    pub retry: RetryConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            quote_asset: String::from("USDT"),
            cap_threshold: 100_000_000.0,
            min_quote_volume: 0.0,
            min_age_days: 90,
            top_k: None,
            concurrency: 8,
            retry: RetryConfig::default(),
        }
    }
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<(), ScreenError> {
        if self.quote_asset.trim().is_empty() {
            return Err(ScreenError::config("quote asset cannot be empty"));
        }
        if !self.cap_threshold.is_finite() || self.cap_threshold <= 0.0 {
            return Err(ScreenError::config("cap threshold must be a positive number"));
        }
        if !self.min_quote_volume.is_finite() || self.min_quote_volume < 0.0 {
            return Err(ScreenError::config(
                "minimum quote volume must be a non-negative number",
            ));
        }
        if self.concurrency == 0 {
            return Err(ScreenError::config("worker pool width must be at least 1"));
        }
        if let Some(0) = self.top_k {
            return Err(ScreenError::config("top-k must be at least 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ScreenConfig::default().validate().expect("must validate");
    }

    #[test]
    fn rejects_zero_concurrency() {
        let config = ScreenConfig {
            concurrency: 0,
            ..ScreenConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_threshold() {
        let config = ScreenConfig {
            cap_threshold: f64::NAN,
            ..ScreenConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
