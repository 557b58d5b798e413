use std::collections::VecDeque;

/// Fixed-capacity trailing window over a scalar stream.
///
/// Statistics are recomputed over the window contents on demand; window
/// sizes here are small enough that the simplicity beats maintaining
/// running sums against float drift.
#[derive(Debug, Clone)]
pub(crate) struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sample standard deviation (n-1 denominator), the pandas default.
    pub fn sample_std(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (n - 1) as f64).sqrt()
    }

    /// Population standard deviation (n denominator), used for the
    /// Bollinger bands.
    pub fn population_std(&self) -> f64 {
        let n = self.values.len();
        if n == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / n as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_value_at_capacity() {
        let mut window = RollingWindow::new(3);
        for value in [1.0, 2.0, 3.0, 4.0] {
            window.push(value);
        }
        assert!(window.is_full());
        assert_eq!(window.mean(), 3.0);
    }

    #[test]
    fn is_not_full_before_capacity() {
        let mut window = RollingWindow::new(3);
        window.push(1.0);
        window.push(2.0);
        assert!(!window.is_full());
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let mut window = RollingWindow::new(4);
        for value in [2.0, 4.0, 4.0, 6.0] {
            window.push(value);
        }
        // variance = ((-2)^2 + 0 + 0 + 2^2) / 3
        let expected = (8.0_f64 / 3.0).sqrt();
        assert!((window.sample_std() - expected).abs() < 1e-12);
    }

    #[test]
    fn population_std_uses_n() {
        let mut window = RollingWindow::new(4);
        for value in [2.0, 4.0, 4.0, 6.0] {
            window.push(value);
        }
        let expected = (8.0_f64 / 4.0).sqrt();
        assert!((window.population_std() - expected).abs() < 1e-12);
    }

    #[test]
    fn constant_window_has_zero_std() {
        let mut window = RollingWindow::new(5);
        for _ in 0..5 {
            window.push(7.5);
        }
        assert_eq!(window.sample_std(), 0.0);
        assert_eq!(window.population_std(), 0.0);
    }
}
