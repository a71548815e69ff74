//! Rate-to-period scheduling
//!
//! Pure functions mapping an update rate and the previous scheduled time to
//! the next permitted time.

use contracts::SimTime;

/// Next permitted scheduled update time.
///
/// A rate of zero means "no throttling": the sensor is eligible again at
/// `last`. Otherwise the next time is one period after `last`.
///
/// Rates are expected to be sanitized already; see [`sanitize_rate`].
pub fn next_update_time(rate_hz: f64, last: SimTime) -> SimTime {
    if rate_hz > 0.0 {
        last + 1.0 / rate_hz
    } else {
        last
    }
}

/// Normalize a configured rate: negative or NaN becomes 0 (unthrottled).
pub fn sanitize_rate(rate_hz: f64) -> f64 {
    if rate_hz.is_nan() || rate_hz < 0.0 {
        0.0
    } else {
        rate_hz
    }
}

/// Period in seconds for a rate, `None` when unthrottled.
pub fn period(rate_hz: f64) -> Option<f64> {
    (rate_hz > 0.0).then(|| 1.0 / rate_hz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_rate_adds_period() {
        assert_eq!(next_update_time(10.0, 0.0), 0.1);
        assert_eq!(next_update_time(4.0, 1.0), 1.25);
        assert_eq!(next_update_time(10.0, 0.1), 0.1 + 1.0 / 10.0);
    }

    #[test]
    fn test_zero_rate_is_unthrottled() {
        assert_eq!(next_update_time(0.0, 5.0), 5.0);
        assert_eq!(period(0.0), None);
    }

    #[test]
    fn test_sanitize_rate() {
        assert_eq!(sanitize_rate(-5.0), 0.0);
        assert_eq!(sanitize_rate(f64::NAN), 0.0);
        assert_eq!(sanitize_rate(0.0), 0.0);
        assert_eq!(sanitize_rate(30.0), 30.0);
    }

    #[test]
    fn test_period() {
        assert_eq!(period(4.0), Some(0.25));
    }
}
