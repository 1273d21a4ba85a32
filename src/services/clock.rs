//! Wall-clock access for the gate and signal timestamps.

use chrono::{NaiveTime, Timelike};
use std::sync::atomic::{AtomicU32, Ordering};

/// Source of the local time of day.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;

    /// Current minute of the day, `0..1440`.
    fn minute_of_day(&self) -> u32 {
        let now = self.now();
        now.hour() * 60 + now.minute()
    }

    /// Current time formatted as `HH:MM:SS`.
    fn timestamp(&self) -> String {
        self.now().format("%H:%M:%S").to_string()
    }
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// Manually driven clock, for tests and replays.
#[derive(Debug, Default)]
pub struct FixedClock {
    seconds_of_day: AtomicU32,
}

impl FixedClock {
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        let clock = Self::default();
        clock.set(hour, minute, second);
        clock
    }

    /// Move the clock. Out-of-range components wrap within the day.
    pub fn set(&self, hour: u32, minute: u32, second: u32) {
        let secs = (hour * 3600 + minute * 60 + second) % 86_400;
        self.seconds_of_day.store(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        let secs = self.seconds_of_day.load(Ordering::SeqCst);
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::at(8, 5, 9);
        assert_eq!(clock.minute_of_day(), 485);
        assert_eq!(clock.timestamp(), "08:05:09");

        clock.set(18, 0, 59);
        assert_eq!(clock.minute_of_day(), 1080);
        assert_eq!(clock.timestamp(), "18:00:59");
    }

    #[test]
    fn test_system_clock_in_range() {
        assert!(SystemClock.minute_of_day() < 1440);
        assert_eq!(SystemClock.timestamp().len(), 8);
    }
}
