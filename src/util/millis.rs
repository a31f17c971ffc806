//! Millisecond reduction for duration-like values.
//!
//! All duration arithmetic happens on whole milliseconds. A duration that
//! carries a sub-millisecond remainder is rejected, never truncated.

use chrono::Duration;

use super::{Error, Result};

/// Tolerance, in milliseconds, under which a computed value snaps to the
/// nearest whole millisecond.
pub const SNAP_TOLERANCE_MS: f64 = 1e-6;

/// Reduce a duration to an exact count of milliseconds.
pub fn to_millis(d: &Duration) -> Result<i64> {
    let ms = d.num_milliseconds();
    if *d - Duration::milliseconds(ms) != Duration::zero() {
        return Err(Error::SubMillisecondPrecision(*d));
    }
    Ok(ms)
}

/// Build a duration from a whole number of milliseconds.
pub fn from_millis(ms: i64) -> Result<Duration> {
    Duration::try_milliseconds(ms)
        .ok_or_else(|| Error::invalid(format!("{}ms is outside the representable duration range", ms)))
}

/// Convert an already-integral computed value to `i64`, failing instead of
/// saturating when it does not fit.
pub fn checked_i64(x: f64) -> Result<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict bound.
    if x.is_finite() && x >= i64::MIN as f64 && x < i64::MAX as f64 {
        Ok(x as i64)
    } else {
        Err(Error::invalid(format!("{} does not fit a 64-bit integer", x)))
    }
}

/// Round a computed millisecond value up to the next whole millisecond.
///
/// Values within [`SNAP_TOLERANCE_MS`] of an integer are taken as that
/// integer, so float noise in an exact product does not bump it by one.
pub fn ceil_millis(ms: f64) -> Result<i64> {
    let nearest = ms.round();
    if (ms - nearest).abs() <= SNAP_TOLERANCE_MS {
        checked_i64(nearest)
    } else {
        checked_i64(ms.ceil())
    }
}

/// Exact whole milliseconds of a computed value, or `None` when it has a
/// fractional part beyond [`SNAP_TOLERANCE_MS`].
pub fn exact_millis(ms: f64) -> Result<Option<i64>> {
    let nearest = ms.round();
    if (ms - nearest).abs() <= SNAP_TOLERANCE_MS {
        checked_i64(nearest).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_millis() {
        assert_eq!(to_millis(&Duration::seconds(2)).unwrap(), 2000);
        assert_eq!(to_millis(&Duration::milliseconds(-7)).unwrap(), -7);
        assert_eq!(to_millis(&Duration::zero()).unwrap(), 0);
    }

    #[test]
    fn test_sub_millisecond_rejected() {
        let d = Duration::microseconds(1500);
        assert!(matches!(to_millis(&d), Err(Error::SubMillisecondPrecision(_))));

        let d = Duration::nanoseconds(-1);
        assert!(to_millis(&d).is_err());
    }

    #[test]
    fn test_ceil_millis() {
        assert_eq!(ceil_millis(4.0).unwrap(), 4);
        assert_eq!(ceil_millis(3999.9999999).unwrap(), 4000);
        assert_eq!(ceil_millis(333.333).unwrap(), 334);
        assert_eq!(ceil_millis(-0.5).unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_values_fail() {
        assert!(matches!(ceil_millis(-1e19), Err(Error::InvalidParameter(_))));
        assert!(matches!(ceil_millis(f64::INFINITY), Err(Error::InvalidParameter(_))));
        assert!(matches!(exact_millis(1e25), Err(Error::InvalidParameter(_))));
        assert!(checked_i64(i64::MAX as f64).is_err());
        assert_eq!(checked_i64(-9.0e18).unwrap(), -9_000_000_000_000_000_000);
        assert!(from_millis(i64::MIN).is_err());
    }

    #[test]
    fn test_exact_millis() {
        assert_eq!(exact_millis(8.0).unwrap(), Some(8));
        assert_eq!(exact_millis(8.5).unwrap(), None);
    }
}
