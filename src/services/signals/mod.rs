//! EMA crossover signal generation.
//!
//! A fast (5) and a slow (13) EMA are fed from the same price sample on each
//! tick; a crossover between their two latest points is a Buy or Sell signal.

pub mod crossover;
pub mod ema;
pub mod engine;

pub use crossover::{classify_crossover, classify_points};
pub use ema::{EmaSeries, EMA_CAPACITY};
pub use engine::{risk_levels, Session, DEFAULT_INITIAL_PRICE, LONG_PERIOD, SHORT_PERIOD};
