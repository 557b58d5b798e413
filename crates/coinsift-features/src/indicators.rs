//! Wilder-smoothed momentum/trend accumulators.
//!
//! Both accumulators consume bars left to right and yield `None` until
//! their warm-up window has elapsed, matching the missing-value policy of
//! the matrix engine.

/// Relative strength index with Wilder smoothing.
#[derive(Debug, Clone)]
pub(crate) struct RsiAccumulator {
    period: usize,
    prev_close: Option<f64>,
    diffs_seen: usize,
    sum_gain: f64,
    sum_loss: f64,
    avg_gain: f64,
    avg_loss: f64,
}

impl RsiAccumulator {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            prev_close: None,
            diffs_seen: 0,
            sum_gain: 0.0,
            sum_loss: 0.0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        }
    }

    pub fn push(&mut self, close: f64) -> Option<f64> {
        let prev = match self.prev_close.replace(close) {
            Some(prev) => prev,
            None => return None,
        };

        let diff = close - prev;
        let gain = diff.max(0.0);
        let loss = (-diff).max(0.0);
        self.diffs_seen += 1;

        if self.diffs_seen < self.period {
            self.sum_gain += gain;
            self.sum_loss += loss;
            return None;
        }

        if self.diffs_seen == self.period {
            self.avg_gain = (self.sum_gain + gain) / self.period as f64;
            self.avg_loss = (self.sum_loss + loss) / self.period as f64;
        } else {
            let n = self.period as f64;
            self.avg_gain = (self.avg_gain * (n - 1.0) + gain) / n;
            self.avg_loss = (self.avg_loss * (n - 1.0) + loss) / n;
        }

        // A flat window has neither gains nor losses; read it as the
        // midpoint instead of propagating a 0/0.
        if self.avg_gain == 0.0 && self.avg_loss == 0.0 {
            return Some(50.0);
        }
        if self.avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = self.avg_gain / self.avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

/// Average directional index with Wilder smoothing.
///
/// Needs a full period of true range / directional movement for the DI
/// legs, then another full period of DX values before the first ADX.
#[derive(Debug, Clone)]
pub(crate) struct AdxAccumulator {
    period: usize,
    prev: Option<(f64, f64, f64)>,
    samples_seen: usize,
    smoothed_tr: f64,
    smoothed_plus_dm: f64,
    smoothed_minus_dm: f64,
    dx_seen: usize,
    dx_sum: f64,
    adx: f64,
}

impl AdxAccumulator {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            prev: None,
            samples_seen: 0,
            smoothed_tr: 0.0,
            smoothed_plus_dm: 0.0,
            smoothed_minus_dm: 0.0,
            dx_seen: 0,
            dx_sum: 0.0,
            adx: 0.0,
        }
    }

    pub fn push(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        let (prev_high, prev_low, prev_close) = match self.prev.replace((high, low, close)) {
            Some(prev) => prev,
            None => return None,
        };

        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());
        let up_move = high - prev_high;
        let down_move = prev_low - low;
        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        self.samples_seen += 1;

        if self.samples_seen <= self.period {
            self.smoothed_tr += tr;
            self.smoothed_plus_dm += plus_dm;
            self.smoothed_minus_dm += minus_dm;
            if self.samples_seen < self.period {
                return None;
            }
        } else {
            let n = self.period as f64;
            self.smoothed_tr = self.smoothed_tr - self.smoothed_tr / n + tr;
            self.smoothed_plus_dm = self.smoothed_plus_dm - self.smoothed_plus_dm / n + plus_dm;
            self.smoothed_minus_dm = self.smoothed_minus_dm - self.smoothed_minus_dm / n + minus_dm;
        }

        let dx = if self.smoothed_tr > 0.0 {
            let plus_di = 100.0 * self.smoothed_plus_dm / self.smoothed_tr;
            let minus_di = 100.0 * self.smoothed_minus_dm / self.smoothed_tr;
            let di_sum = plus_di + minus_di;
            if di_sum > 0.0 {
                100.0 * (plus_di - minus_di).abs() / di_sum
            } else {
                0.0
            }
        } else {
            0.0
        };

        self.dx_seen += 1;
        if self.dx_seen < self.period {
            self.dx_sum += dx;
            return None;
        }

        if self.dx_seen == self.period {
            self.adx = (self.dx_sum + dx) / self.period as f64;
        } else {
            let n = self.period as f64;
            self.adx = (self.adx * (n - 1.0) + dx) / n;
        }

        Some(self.adx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_warms_up_after_period_diffs() {
        let mut rsi = RsiAccumulator::new(3);
        assert_eq!(rsi.push(10.0), None);
        assert_eq!(rsi.push(11.0), None);
        assert_eq!(rsi.push(12.0), None);
        // third diff completes the window
        let value = rsi.push(13.0).expect("rsi defined");
        assert_eq!(value, 100.0);
    }

    #[test]
    fn rsi_on_flat_closes_reads_midpoint() {
        let mut rsi = RsiAccumulator::new(14);
        let mut last = None;
        for _ in 0..40 {
            last = rsi.push(5.0);
        }
        assert_eq!(last, Some(50.0));
    }

    #[test]
    fn rsi_is_bounded() {
        let mut rsi = RsiAccumulator::new(5);
        let closes = [
            10.0, 10.5, 9.8, 10.2, 11.0, 10.7, 10.9, 11.5, 11.2, 12.0, 11.8, 12.5,
        ];
        for close in closes {
            if let Some(value) = rsi.push(close) {
                assert!((0.0..=100.0).contains(&value), "rsi={value}");
            }
        }
    }

    #[test]
    fn rsi_alternating_gains_and_losses_sits_near_midpoint() {
        let mut rsi = RsiAccumulator::new(2);
        let mut last = None;
        for index in 0..20 {
            let close = if index % 2 == 0 { 10.0 } else { 11.0 };
            last = rsi.push(close);
        }
        let value = last.expect("rsi defined");
        assert!(value > 20.0 && value < 80.0, "rsi={value}");
    }

    #[test]
    fn adx_warms_up_after_two_periods() {
        let mut adx = AdxAccumulator::new(3);
        let mut defined_at = None;
        for index in 0..12 {
            let base = 10.0 + index as f64;
            if adx.push(base + 1.0, base - 1.0, base).is_some() && defined_at.is_none() {
                defined_at = Some(index);
            }
        }
        // first bar is the seed, then period TR samples, then period DX
        assert_eq!(defined_at, Some(5));
    }

    #[test]
    fn adx_on_strong_trend_is_high_and_bounded() {
        let mut adx = AdxAccumulator::new(5);
        let mut last = None;
        for index in 0..60 {
            let base = 100.0 + index as f64 * 2.0;
            last = adx.push(base + 1.0, base - 1.0, base + 0.5);
        }
        let value = last.expect("adx defined");
        assert!(value > 50.0, "adx={value}");
        assert!(value <= 100.0, "adx={value}");
    }

    #[test]
    fn adx_on_flat_bars_is_zero() {
        let mut adx = AdxAccumulator::new(4);
        let mut last = None;
        for _ in 0..30 {
            last = adx.push(10.0, 10.0, 10.0);
        }
        assert_eq!(last, Some(0.0));
    }
}
