use serde::Serialize;
use std::fmt;

/// Crossover classification for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    /// No crossover on this tick.
    #[default]
    None,
    /// Fast EMA crossed above the slow EMA.
    Buy,
    /// Fast EMA crossed below the slow EMA.
    Sell,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::None => "NONE",
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "No signal",
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one engine tick.
///
/// `stop_loss` and `take_profit` are derived from the current price on every
/// tick, including ticks without a crossover.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldSignal {
    /// True exactly when `kind` is not `None`.
    pub has_signal: bool,
    pub kind: SignalKind,
    /// Price sample that produced this signal.
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Wall-clock time formatted as HH:MM:SS (display only).
    pub timestamp: String,
}

impl GoldSignal {
    pub fn new(
        kind: SignalKind,
        price: f64,
        stop_loss: f64,
        take_profit: f64,
        timestamp: String,
    ) -> Self {
        Self {
            has_signal: kind.is_actionable(),
            kind,
            price,
            stop_loss,
            take_profit,
            timestamp,
        }
    }
}
