//! Signal alerts.
//!
//! The monitor calls a [`SignalNotifier`] for every tick whose signal has a
//! Buy or Sell classification. Delivery (push, desktop, chat) is up to the
//! implementation.

use tracing::info;

use crate::error::Result;
use crate::types::GoldSignal;

/// Receives actionable signals.
pub trait SignalNotifier: Send + Sync {
    fn notify(&self, signal: &GoldSignal) -> Result<()>;
}

/// User-facing alert text for a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalAlert {
    pub title: String,
    pub summary: String,
    pub body: String,
}

impl SignalAlert {
    pub fn from_signal(signal: &GoldSignal) -> Self {
        let kind = signal.kind.name();
        Self {
            title: format!("Gold signal - {}", kind),
            summary: format!("Price: {:.2}", signal.price),
            body: format!(
                "Signal: {}\nPrice: {:.2}\nTake profit: {:.2}\nStop loss: {:.2}\nTime: {}",
                kind, signal.price, signal.take_profit, signal.stop_loss, signal.timestamp
            ),
        }
    }
}

/// Writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl SignalNotifier for LogNotifier {
    fn notify(&self, signal: &GoldSignal) -> Result<()> {
        let alert = SignalAlert::from_signal(signal);
        info!(
            kind = %signal.kind,
            price = signal.price,
            stop_loss = signal.stop_loss,
            take_profit = signal.take_profit,
            "{} ({}): {}",
            alert.title,
            alert.summary,
            alert.body.replace('\n', " | ")
        );
        Ok(())
    }
}
