//! Events published by the monitor to presentation subscribers.

use serde::Serialize;

use super::{GoldSignal, WorkingWindow};

/// A single update from a monitoring session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// A session started with the given window.
    Started { window: WorkingWindow },
    /// The engine ran a tick.
    Signal(GoldSignal),
    /// The gate was closed; no tick ran.
    OutsideWorkingHours,
    /// A tick failed; the loop backs off and continues.
    TickFailed(String),
    /// The session ended.
    Stopped,
}

impl MonitorEvent {
    /// One-line log text for this event.
    pub fn describe(&self) -> String {
        match self {
            MonitorEvent::Started { window } => format!("Monitoring started ({})", window),
            MonitorEvent::Signal(signal) => format!(
                "Price: {:.2} | Signal: {} | SL {:.2} | TP {:.2} | {}",
                signal.price,
                signal.kind.name(),
                signal.stop_loss,
                signal.take_profit,
                signal.timestamp
            ),
            MonitorEvent::OutsideWorkingHours => {
                "Outside working hours - waiting for working hours".to_string()
            }
            MonitorEvent::TickFailed(msg) => format!("Error: {}", msg),
            MonitorEvent::Stopped => "Monitoring stopped".to_string(),
        }
    }
}
