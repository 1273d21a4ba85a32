use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Daily time-of-day interval during which signal generation may run.
///
/// Both ends are inclusive minute-of-day values in `[0, 1439]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingWindow {
    start_minute_of_day: u32,
    end_minute_of_day: u32,
}

impl WorkingWindow {
    /// Create a window from minute-of-day bounds.
    pub fn new(start_minute_of_day: u32, end_minute_of_day: u32) -> Result<Self> {
        let window = Self {
            start_minute_of_day,
            end_minute_of_day,
        };
        window.validate()?;
        Ok(window)
    }

    /// Create a window from hour/minute pairs.
    pub fn from_hm(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Result<Self> {
        Self::new(
            hm_to_minutes(start_hour, start_minute)?,
            hm_to_minutes(end_hour, end_minute)?,
        )
    }

    /// Parse `"H:MM"` bounds, e.g. `("8:00", "18:00")`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_hm(start)?, parse_hm(end)?)
    }

    pub fn start(&self) -> u32 {
        self.start_minute_of_day
    }

    pub fn end(&self) -> u32 {
        self.end_minute_of_day
    }

    /// Check both bounds lie within a day. Deserialized windows skip `new`,
    /// so stores call this after loading.
    pub fn validate(&self) -> Result<()> {
        let bounds = [
            ("start", self.start_minute_of_day),
            ("end", self.end_minute_of_day),
        ];
        for (label, minute) in bounds {
            if minute >= MINUTES_PER_DAY {
                return Err(AppError::InvalidWindow(format!(
                    "{} minute {} is outside 0..{}",
                    label, minute, MINUTES_PER_DAY
                )));
            }
        }
        Ok(())
    }

    /// Overnight windows (`start > end`) are never open.
    pub fn is_overnight(&self) -> bool {
        self.start_minute_of_day > self.end_minute_of_day
    }
}

impl Default for WorkingWindow {
    fn default() -> Self {
        // 08:00 - 18:00
        Self {
            start_minute_of_day: 8 * 60,
            end_minute_of_day: 18 * 60,
        }
    }
}

impl fmt::Display for WorkingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_hm(self.start_minute_of_day),
            format_hm(self.end_minute_of_day)
        )
    }
}

fn hm_to_minutes(hour: u32, minute: u32) -> Result<u32> {
    if hour >= 24 || minute >= 60 {
        return Err(AppError::InvalidWindow(format!(
            "{}:{:02} is not a time of day",
            hour, minute
        )));
    }
    Ok(hour * 60 + minute)
}

fn parse_hm(s: &str) -> Result<u32> {
    let (hour, minute) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| AppError::InvalidWindow(format!("expected H:MM, got {:?}", s)))?;
    let hour: u32 = hour
        .parse()
        .map_err(|_| AppError::InvalidWindow(format!("bad hour in {:?}", s)))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| AppError::InvalidWindow(format!("bad minute in {:?}", s)))?;
    hm_to_minutes(hour, minute)
}

fn format_hm(minute_of_day: u32) -> String {
    format!("{}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let window = WorkingWindow::default();
        assert_eq!(window.start(), 480);
        assert_eq!(window.end(), 1080);
        assert_eq!(window.to_string(), "8:00 - 18:00");
    }

    #[test]
    fn test_parse_window() {
        let window = WorkingWindow::parse("9:30", "17:05").unwrap();
        assert_eq!(window.start(), 570);
        assert_eq!(window.end(), 1025);
        assert_eq!(window.to_string(), "9:30 - 17:05");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(WorkingWindow::new(0, 1440).is_err());
        assert!(WorkingWindow::from_hm(24, 0, 18, 0).is_err());
        assert!(WorkingWindow::from_hm(8, 60, 18, 0).is_err());
        assert!(WorkingWindow::parse("8", "18:00").is_err());
        assert!(WorkingWindow::parse("8:xx", "18:00").is_err());
    }

    #[test]
    fn test_full_day_bounds_accepted() {
        let window = WorkingWindow::new(0, 1439).unwrap();
        assert!(!window.is_overnight());
        assert_eq!(window.to_string(), "0:00 - 23:59");
    }

    #[test]
    fn test_overnight_flag() {
        let window = WorkingWindow::from_hm(22, 0, 6, 0).unwrap();
        assert!(window.is_overnight());
    }

    #[test]
    fn test_serialization() {
        let window = WorkingWindow::default();
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, r#"{"startMinuteOfDay":480,"endMinuteOfDay":1080}"#);

        let parsed: WorkingWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, window);
    }
}
