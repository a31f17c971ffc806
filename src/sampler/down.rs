//! Decimated indices over a dense index space.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, Range, Sampler, Scalar, Value};
use crate::util::millis::checked_i64;
use crate::util::{Error, Result};

/// Slack, in dense samples, added before flooring a non-integral factor.
const FLOOR_EPSILON: f64 = 1e-9;

/// Largest factor that `f64` still holds as an exact integer.
const MAX_EXACT_FACTOR: f64 = 9_007_199_254_740_992.0;

/// Tolerance for snapping a rate ratio to an integral factor.
const FACTOR_SNAP: f64 = 1e-9;

/// Which dense sample of a decimation window a decimated sample reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// First sample of the window.
    #[default]
    Left,
    /// Middle of the window.
    Center,
    /// Last sample of the window.
    Right,
}

impl Alignment {
    /// Offset of the reported sample from the window start.
    pub fn offset(&self, factor: f64) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => factor / 2.0,
            Self::Right => factor - 1.0,
        }
    }
}

/// Dense index (base) <-> decimated index (self).
///
/// Decimated sample `k` covers dense samples
/// `(k-1)*factor + 1 ..< k*factor + 1`. Alignment only moves the dense
/// sample reported by `forward`; `backward` always classifies by window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DownSampler {
    factor: f64,
    alignment: Alignment,
    offset: f64,
}

impl DownSampler {
    pub fn new(factor: f64, alignment: Alignment) -> Result<Self> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(Error::invalid(format!("decimation factor must be >= 1, got {}", factor)));
        }
        let offset = alignment.offset(factor);
        tracing::debug!(factor, ?alignment, offset, "DownSampler");
        Ok(Self { factor, alignment, offset })
    }

    /// Decimate from `fs` Hz to `fdcm` Hz.
    pub fn from_rates(fs: f64, fdcm: f64, alignment: Alignment) -> Result<Self> {
        if !fdcm.is_finite() || fdcm <= 0.0 {
            return Err(Error::invalid(format!("decimated rate must be positive, got {}", fdcm)));
        }
        let ratio = fs / fdcm;
        let nearest = ratio.round();
        let factor = if (ratio - nearest).abs() <= FACTOR_SNAP * nearest.max(1.0) {
            nearest
        } else {
            ratio
        };
        Self::new(factor, alignment)
    }

    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// The factor as an integer, when it is one.
    fn integral_factor(&self) -> Option<i64> {
        (self.factor.fract() == 0.0 && self.factor <= MAX_EXACT_FACTOR).then_some(self.factor as i64)
    }

    /// Dense index reported for decimated sample `index`.
    pub fn dense_index(&self, index: i64) -> Result<i64> {
        let k = zero_based(index)?;
        let dense = match self.integral_factor() {
            // (k*f + 1 + offset).floor() with an integral k*f + 1
            Some(f) => k
                .checked_mul(f)
                .and_then(|x| x.checked_add(1 + self.offset.floor() as i64)),
            None => checked_i64((k as f64 * self.factor + 1.0 + self.offset + FLOOR_EPSILON).floor()).ok(),
        };
        dense.ok_or_else(|| Error::invalid(format!("decimated index {} overflows the dense index", index)))
    }

    /// Decimation window containing dense sample `index`.
    pub fn window_of(&self, index: i64) -> Result<i64> {
        let k = zero_based(index)?;
        let window = match self.integral_factor() {
            Some(f) => k.div_euclid(f),
            None => checked_i64(((k as f64 + FLOOR_EPSILON) / self.factor).floor())?,
        };
        // |window| <= |k| < i64::MAX, so this cannot overflow
        Ok(window + 1)
    }

    fn index_arg(&self, s: &Scalar, direction: Direction) -> Result<i64> {
        s.as_index()
            .ok_or_else(|| self.unsupported(direction, &Value::Scalar(*s)))
    }
}

fn zero_based(index: i64) -> Result<i64> {
    index
        .checked_sub(1)
        .ok_or_else(|| Error::invalid(format!("index {} underflows", index)))
}

impl Sampler for DownSampler {
    fn name(&self) -> &'static str {
        "DownSampler"
    }

    fn forward_scalar(&self, value: &Scalar) -> Result<Value> {
        Ok(self.dense_index(self.index_arg(value, Direction::Forward)?)?.into())
    }

    fn backward_scalar(&self, value: &Scalar) -> Result<Value> {
        Ok(self.window_of(self.index_arg(value, Direction::Backward)?)?.into())
    }

    /// Only the bounds are converted; the step is carried over unchanged, so
    /// interior elements of a stepped range are not guaranteed to line up
    /// with the scalar rule.
    fn forward_range(&self, value: &Range) -> Result<Value> {
        let (start, step, stop) = value
            .index_bounds()
            .ok_or_else(|| self.unsupported(Direction::Forward, &Value::Range(*value)))?;
        if step != 1 {
            tracing::trace!(start, step, stop, "stepped range decimated by bounds only");
        }
        Ok(Range::new(self.dense_index(start)?, step, self.dense_index(stop)?).into())
    }

    fn backward_range(&self, value: &Range) -> Result<Value> {
        if !value.is_unit_step() {
            return Err(self.unsupported(Direction::Backward, &Value::Range(*value)));
        }
        let (start, _, stop) = value
            .index_bounds()
            .ok_or_else(|| self.unsupported(Direction::Backward, &Value::Range(*value)))?;
        Ok(Range::indices(self.window_of(start)?, self.window_of(stop)?).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Interval;

    fn idx(i: i64) -> Value {
        Value::from(i)
    }

    #[test]
    fn test_alignment_offsets() {
        let left = DownSampler::from_rates(250.0, 0.1, Alignment::Left).unwrap();
        let center = DownSampler::from_rates(250.0, 0.1, Alignment::Center).unwrap();
        let right = DownSampler::from_rates(250.0, 0.1, Alignment::Right).unwrap();
        assert_eq!(left.factor(), 2500.0);

        assert_eq!(left.forward(&idx(1)).unwrap(), idx(1));
        assert_eq!(center.forward(&idx(1)).unwrap(), idx(1251));
        assert_eq!(right.forward(&idx(1)).unwrap(), idx(2500));
        assert_eq!(left.forward(&idx(2)).unwrap(), idx(2501));

        for ds in [left, center, right] {
            assert_eq!(ds.backward(&idx(1)).unwrap(), idx(1));
            assert_eq!(ds.backward(&idx(2500)).unwrap(), idx(1));
            assert_eq!(ds.backward(&idx(2501)).unwrap(), idx(2));
        }
    }

    #[test]
    fn test_forward_lands_in_own_window() {
        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            let ds = DownSampler::new(7.0, alignment).unwrap();
            for k in 1..40 {
                assert_eq!(ds.window_of(ds.dense_index(k).unwrap()).unwrap(), k);
            }
        }
        let odd = DownSampler::new(2.5, Alignment::Center).unwrap();
        for k in 1..40 {
            assert_eq!(odd.window_of(odd.dense_index(k).unwrap()).unwrap(), k);
        }
    }

    #[test]
    fn test_huge_factor_window_edges() {
        let f = 10_000_000_000i64;
        let ds = DownSampler::new(f as f64, Alignment::Right).unwrap();
        assert_eq!(ds.window_of(f).unwrap(), 1);
        assert_eq!(ds.window_of(f + 1).unwrap(), 2);
        assert_eq!(ds.window_of(2 * f).unwrap(), 2);
        assert_eq!(ds.dense_index(2).unwrap(), 2 * f);
    }

    #[test]
    fn test_extreme_indices_fail_cleanly() {
        let ds = DownSampler::new(2.0, Alignment::Left).unwrap();
        assert!(matches!(ds.forward(&idx(i64::MIN)), Err(Error::InvalidParameter(_))));
        assert!(matches!(ds.backward(&idx(i64::MIN)), Err(Error::InvalidParameter(_))));
        assert!(matches!(ds.forward(&idx(i64::MAX)), Err(Error::InvalidParameter(_))));
        assert_eq!(ds.backward(&idx(i64::MAX)).unwrap(), idx(i64::MAX / 2 + 1));

        let frac = DownSampler::new(2.5, Alignment::Left).unwrap();
        assert!(matches!(frac.forward(&idx(i64::MAX)), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_ranges() {
        let ds = DownSampler::new(20.0, Alignment::Left).unwrap();
        assert_eq!(
            ds.forward(&Range::new(1i64, 2i64, 5i64).into()).unwrap(),
            Value::from(Range::new(1i64, 2i64, 81i64))
        );
        assert_eq!(
            ds.backward(&Range::indices(1, 45).into()).unwrap(),
            Value::from(Range::indices(1, 3))
        );
        assert!(ds.backward(&Range::new(1i64, 2i64, 45i64).into()).is_err());
    }

    #[test]
    fn test_interval_is_unsupported() {
        let ds = DownSampler::new(20.0, Alignment::Left).unwrap();
        let err = ds.forward(&Interval::new(1i64, 3i64).into()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedConversion { sampler: "DownSampler", .. }
        ));
    }

    #[test]
    fn test_invalid_factor() {
        assert!(DownSampler::new(0.5, Alignment::Left).is_err());
        assert!(DownSampler::new(f64::INFINITY, Alignment::Left).is_err());
        assert!(DownSampler::from_rates(250.0, 0.0, Alignment::Left).is_err());
    }

    #[test]
    fn test_alignment_serde() {
        let a: Alignment = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(a, Alignment::Center);
        assert_eq!(Alignment::default(), Alignment::Left);
    }
}
