//! Price feed strategies.
//!
//! The engine only asks for "the next price given the previous one", so a
//! market-data adapter, a random walk or a scripted sequence can drive it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default maximum absolute move per tick.
pub const DEFAULT_MAX_STEP: f64 = 5.0;

/// Largest step whose sampling range `[-step, step]` still has a finite width.
const MAX_STEP_LIMIT: f64 = f64::MAX / 4.0;

/// Source of the next price sample.
pub trait PriceFeed: Send {
    /// Produce the next price from the previous one.
    fn next_price(&mut self, previous: f64) -> f64;
}

impl<F: PriceFeed + ?Sized> PriceFeed for Box<F> {
    fn next_price(&mut self, previous: f64) -> f64 {
        (**self).next_price(previous)
    }
}

/// Bounded random walk: `previous + Δ` with `Δ` uniform in `[-max_step, max_step]`.
pub struct RandomWalkFeed<R: Rng + Send = StdRng> {
    rng: R,
    max_step: f64,
}

impl RandomWalkFeed<StdRng> {
    /// Random walk seeded from OS entropy.
    pub fn from_entropy(max_step: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), max_step)
    }

    /// Reproducible random walk.
    pub fn seeded(seed: u64, max_step: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), max_step)
    }
}

impl<R: Rng + Send> RandomWalkFeed<R> {
    /// A non-finite `max_step` gives a flat feed; huge steps are clamped.
    pub fn with_rng(rng: R, max_step: f64) -> Self {
        let max_step = if max_step.is_finite() {
            max_step.abs().min(MAX_STEP_LIMIT)
        } else {
            0.0
        };
        Self { rng, max_step }
    }

    pub fn max_step(&self) -> f64 {
        self.max_step
    }
}

impl Default for RandomWalkFeed<StdRng> {
    fn default() -> Self {
        Self::from_entropy(DEFAULT_MAX_STEP)
    }
}

impl<R: Rng + Send> PriceFeed for RandomWalkFeed<R> {
    fn next_price(&mut self, previous: f64) -> f64 {
        if self.max_step == 0.0 {
            return previous;
        }
        previous + self.rng.gen_range(-self.max_step..=self.max_step)
    }
}

/// Replays a fixed list of price deltas, cycling when exhausted.
///
/// An empty script leaves the price unchanged.
#[derive(Debug, Clone)]
pub struct ScriptedFeed {
    deltas: Vec<f64>,
    cursor: usize,
}

impl ScriptedFeed {
    pub fn new(deltas: Vec<f64>) -> Self {
        Self {
            deltas,
            cursor: 0,
        }
    }
}

impl PriceFeed for ScriptedFeed {
    fn next_price(&mut self, previous: f64) -> f64 {
        if self.deltas.is_empty() {
            return previous;
        }
        let delta = self.deltas[self.cursor % self.deltas.len()];
        self.cursor += 1;
        previous + delta
    }
}
