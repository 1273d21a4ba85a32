//! Fast/slow EMA crossover classification.

use super::ema::EmaSeries;
use crate::types::SignalKind;

/// Classify a crossover from the previous and current (fast, slow) pairs.
///
/// Buy is checked before Sell, so when the previous pair is equal the
/// current comparison alone decides the outcome.
pub fn classify_points(prev: (f64, f64), cur: (f64, f64)) -> SignalKind {
    let (prev_short, prev_long) = prev;
    let (cur_short, cur_long) = cur;

    if prev_short <= prev_long && cur_short > cur_long {
        return SignalKind::Buy;
    }

    if prev_short >= prev_long && cur_short < cur_long {
        return SignalKind::Sell;
    }

    SignalKind::None
}

/// Classify the two most recent points of a fast and a slow series.
///
/// Both series need at least two values; otherwise there is no signal.
pub fn classify_crossover(short: &EmaSeries, long: &EmaSeries) -> SignalKind {
    match (short.previous(), long.previous(), short.last(), long.last()) {
        (Some(prev_short), Some(prev_long), Some(cur_short), Some(cur_long)) => {
            classify_points((prev_short, prev_long), (cur_short, cur_long))
        }
        _ => SignalKind::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_above_is_buy() {
        // short [.., 10, 12], long [.., 11, 11]
        assert_eq!(classify_points((10.0, 11.0), (12.0, 11.0)), SignalKind::Buy);
    }

    #[test]
    fn test_cross_below_is_sell() {
        // short [.., 12, 10], long [.., 11, 11]
        assert_eq!(classify_points((12.0, 11.0), (10.0, 11.0)), SignalKind::Sell);
    }

    #[test]
    fn test_no_cross_is_none() {
        assert_eq!(classify_points((12.0, 11.0), (13.0, 11.0)), SignalKind::None);
        assert_eq!(classify_points((10.0, 11.0), (10.5, 11.0)), SignalKind::None);
    }

    #[test]
    fn test_touching_is_not_a_cross() {
        assert_eq!(classify_points((10.0, 11.0), (11.0, 11.0)), SignalKind::None);
        assert_eq!(classify_points((12.0, 11.0), (11.0, 11.0)), SignalKind::None);
        assert_eq!(classify_points((11.0, 11.0), (11.0, 11.0)), SignalKind::None);
    }

    #[test]
    fn test_equal_previous_pair() {
        assert_eq!(classify_points((11.0, 11.0), (12.0, 11.0)), SignalKind::Buy);
        assert_eq!(classify_points((11.0, 11.0), (10.0, 11.0)), SignalKind::Sell);
    }

    #[test]
    fn test_requires_two_points() {
        let mut short = EmaSeries::new(5);
        let mut long = EmaSeries::new(13);
        assert_eq!(classify_crossover(&short, &long), SignalKind::None);

        short.append(1950.0);
        long.append(1950.0);
        assert_eq!(classify_crossover(&short, &long), SignalKind::None);

        short.append(1960.0);
        long.append(1960.0);
        // Fast series reacts more, so it crosses above from the shared seed
        assert_eq!(classify_crossover(&short, &long), SignalKind::Buy);
    }
}
