//! Exponential Moving Average (EMA) series.

use std::collections::VecDeque;

/// Maximum number of EMA values retained per series.
pub const EMA_CAPACITY: usize = 50;

/// Streaming EMA with a bounded history.
///
/// Values are ordered oldest to newest. Once the history holds
/// [`EMA_CAPACITY`] values, each append evicts the oldest one.
#[derive(Debug, Clone)]
pub struct EmaSeries {
    alpha: f64,
    values: VecDeque<f64>,
}

impl EmaSeries {
    /// Create an empty series. `period` must be positive.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be positive");
        Self {
            alpha: 2.0 / (period as f64 + 1.0),
            values: VecDeque::with_capacity(EMA_CAPACITY + 1),
        }
    }

    /// Feed a price sample and return the new EMA value.
    ///
    /// The first sample seeds the series with the price itself.
    pub fn append(&mut self, price: f64) -> f64 {
        let ema = match self.values.back() {
            Some(&last) => price * self.alpha + last * (1.0 - self.alpha),
            None => price,
        };
        self.values.push_back(ema);

        while self.values.len() > EMA_CAPACITY {
            self.values.pop_front();
        }

        ema
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent EMA value.
    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// EMA value before the most recent one.
    pub fn previous(&self) -> Option<f64> {
        let len = self.values.len();
        if len < 2 {
            return None;
        }
        self.values.get(len - 2).copied()
    }

    /// Retained values, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}
