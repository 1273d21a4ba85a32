//! Signal engine: one monitoring session's price and EMA state.

use std::sync::Arc;

use tracing::debug;

use super::crossover::classify_crossover;
use super::ema::EmaSeries;
use crate::services::clock::Clock;
use crate::services::price_feed::PriceFeed;
use crate::types::GoldSignal;

/// Fast EMA period.
pub const SHORT_PERIOD: usize = 5;
/// Slow EMA period.
pub const LONG_PERIOD: usize = 13;
/// Price every session starts from.
pub const DEFAULT_INITIAL_PRICE: f64 = 1950.0;
/// Stop loss as a fraction of the current price.
pub const STOP_LOSS_FACTOR: f64 = 0.99;
/// Take profit as a fraction of the current price.
pub const TAKE_PROFIT_FACTOR: f64 = 1.015;

/// Stop loss and take profit for a price, as `(stop_loss, take_profit)`.
pub fn risk_levels(price: f64) -> (f64, f64) {
    (price * STOP_LOSS_FACTOR, price * TAKE_PROFIT_FACTOR)
}

/// State owned by one monitoring session.
///
/// Both EMA series are always appended together from the same sample, so
/// their indices stay aligned. `tick` mutates the series and needs exclusive
/// access.
pub struct Session {
    feed: Box<dyn PriceFeed>,
    clock: Arc<dyn Clock>,
    current_price: f64,
    short: EmaSeries,
    long: EmaSeries,
}

impl Session {
    /// New session with empty EMA series, starting from `initial_price`.
    ///
    /// `clock` stamps each signal for display.
    pub fn new(feed: Box<dyn PriceFeed>, clock: Arc<dyn Clock>, initial_price: f64) -> Self {
        Self {
            feed,
            clock,
            current_price: initial_price,
            short: EmaSeries::new(SHORT_PERIOD),
            long: EmaSeries::new(LONG_PERIOD),
        }
    }

    /// Advance the feed by one sample and classify the crossover.
    pub fn tick(&mut self) -> GoldSignal {
        let price = self.feed.next_price(self.current_price);
        self.current_price = price;

        let short = self.short.append(price);
        let long = self.long.append(price);

        let kind = classify_crossover(&self.short, &self.long);
        let (stop_loss, take_profit) = risk_levels(price);

        debug!(
            price = price,
            ema_short = short,
            ema_long = long,
            kind = %kind,
            "engine tick"
        );

        GoldSignal::new(kind, price, stop_loss, take_profit, self.clock.timestamp())
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn short_ema(&self) -> &EmaSeries {
        &self.short
    }

    pub fn long_ema(&self) -> &EmaSeries {
        &self.long
    }
}
