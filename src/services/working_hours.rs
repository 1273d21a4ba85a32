//! Working-hours gate.
//!
//! The check is a literal inclusive range test. Windows that cross midnight
//! (`start > end`) are not wrapped and never open.

use std::sync::Arc;

use super::clock::Clock;
use crate::types::WorkingWindow;

/// True when `now_minute` lies in `[window.start(), window.end()]`.
pub fn is_open(now_minute: u32, window: &WorkingWindow) -> bool {
    window.start() <= now_minute && now_minute <= window.end()
}

/// A working window bound to a clock.
#[derive(Clone)]
pub struct WorkingHoursGate {
    window: WorkingWindow,
    clock: Arc<dyn Clock>,
}

impl WorkingHoursGate {
    pub fn new(window: WorkingWindow, clock: Arc<dyn Clock>) -> Self {
        Self { window, clock }
    }

    pub fn window(&self) -> WorkingWindow {
        self.window
    }

    /// Whether the gate is open at the clock's current time.
    pub fn is_open_now(&self) -> bool {
        is_open(self.clock.minute_of_day(), &self.window)
    }
}
