//! Rolling technical indicators over a bounded price window.
//!
//! Statistics:
//! - SMA(n): arithmetic mean of the last n prices
//! - RSI(n): 100 - (100 / (1 + avg_gain / avg_loss)) over the last n price
//!   differences; avg_loss == 0 is defined as RSI = 100 (no division)
//! - Bollinger(n, k): SMA(n) ± k × sample standard deviation
//!
//! Any statistic whose window is not yet full is reported as `None` and must
//! never be read as zero.

use std::collections::VecDeque;

use crate::domain::config::EngineConfig;

/// Point-in-time view of the configured indicators. `None` means the
/// statistic is undefined for lack of history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

/// Bounded price history sized to the largest configured window, with
/// on-demand statistic computation.
#[derive(Debug, Clone)]
pub struct RollingIndicatorEngine {
    prices: VecDeque<f64>,
    capacity: usize,
    sma_short_window: usize,
    sma_long_window: usize,
    rsi_window: usize,
    bollinger_window: usize,
    bollinger_k: f64,
}

impl RollingIndicatorEngine {
    pub fn new(config: &EngineConfig) -> Self {
        // +1 so the RSI window has enough prices for `rsi_window` differences.
        let capacity = config
            .sma_long_window
            .max(config.bollinger_window)
            .max(config.rsi_window)
            + 1;
        Self {
            prices: VecDeque::with_capacity(capacity),
            capacity,
            sma_short_window: config.sma_short_window,
            sma_long_window: config.sma_long_window,
            rsi_window: config.rsi_window,
            bollinger_window: config.bollinger_window,
            bollinger_k: config.bollinger_k,
        }
    }

    /// Append a price, dropping the oldest entry once the buffer is full.
    pub fn push(&mut self, price: f64) {
        if self.prices.len() == self.capacity {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        let (bollinger_upper, bollinger_lower) = match self.bollinger() {
            Some((upper, lower)) => (Some(upper), Some(lower)),
            None => (None, None),
        };
        IndicatorSnapshot {
            sma_short: self.sma(self.sma_short_window),
            sma_long: self.sma(self.sma_long_window),
            rsi: self.rsi(),
            bollinger_upper,
            bollinger_lower,
        }
    }

    fn last_window(&self, window: usize) -> Option<Vec<f64>> {
        if window == 0 || self.prices.len() < window {
            return None;
        }
        Some(
            self.prices
                .iter()
                .skip(self.prices.len() - window)
                .copied()
                .collect(),
        )
    }

    fn sma(&self, window: usize) -> Option<f64> {
        let prices = self.last_window(window)?;
        Some(prices.iter().sum::<f64>() / window as f64)
    }

    /// Needs `rsi_window + 1` prices to form `rsi_window` differences.
    fn rsi(&self) -> Option<f64> {
        let prices = self.last_window(self.rsi_window + 1)?;
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for pair in prices.windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gain_sum += change;
            } else {
                loss_sum += -change;
            }
        }
        let avg_gain = gain_sum / self.rsi_window as f64;
        let avg_loss = loss_sum / self.rsi_window as f64;

        if avg_loss == 0.0 {
            return Some(100.0);
        }
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }

    fn bollinger(&self) -> Option<(f64, f64)> {
        let window = self.bollinger_window;
        let prices = self.last_window(window)?;
        let mean = prices.iter().sum::<f64>() / window as f64;

        // Sample standard deviation; a single-price window has no dispersion.
        let stddev = if window < 2 {
            0.0
        } else {
            let variance = prices
                .iter()
                .map(|p| {
                    let diff = p - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (window - 1) as f64;
            variance.sqrt()
        };

        Some((mean + self.bollinger_k * stddev, mean - self.bollinger_k * stddev))
    }
}
