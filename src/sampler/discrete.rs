//! Uniformly sampled 1-based indices at a fixed rate.

use chrono::Duration;

use crate::core::{Direction, Interval, Range, Sampler, Scalar, Value};
use crate::util::millis::{ceil_millis, checked_i64, exact_millis, from_millis, to_millis};
use crate::util::{Error, Result};

/// Slack added before flooring so exact sample instants computed in floating
/// point do not fall one index short.
const FLOOR_EPSILON: f64 = 1e-9;

/// Duration (base) <-> sample index (self) at `rate` Hz.
///
/// Index 1 sits at duration 0. Going backward, a duration between two sample
/// instants resolves to the earlier one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscreteSampler {
    rate: f64,
}

impl DiscreteSampler {
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::invalid(format!("sampling rate must be positive, got {}", rate)));
        }
        tracing::debug!(rate, "DiscreteSampler");
        Ok(Self { rate })
    }

    /// Samples per second.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Duration of sample `index`, rounded up to whole milliseconds.
    pub fn duration_of(&self, index: i64) -> Result<Duration> {
        let offset = index
            .checked_sub(1)
            .ok_or_else(|| Error::invalid(format!("sample index {} underflows", index)))?;
        from_millis(ceil_millis(offset as f64 * 1000.0 / self.rate)?)
    }

    /// Index of the latest sample at or before `d`.
    pub fn index_of(&self, d: &Duration) -> Result<i64> {
        let ms = to_millis(d)?;
        checked_i64((ms as f64 * self.rate / 1000.0 + FLOOR_EPSILON).floor())?
            .checked_add(1)
            .ok_or_else(|| Error::invalid(format!("{}ms past the epoch overflows the sample index", ms)))
    }

    fn index_arg(&self, s: &Scalar, direction: Direction, value: &Value) -> Result<i64> {
        s.as_index().ok_or_else(|| self.unsupported(direction, value))
    }

    fn duration_arg(&self, s: &Scalar, direction: Direction, value: &Value) -> Result<Duration> {
        s.as_duration().ok_or_else(|| self.unsupported(direction, value))
    }
}

impl Sampler for DiscreteSampler {
    fn name(&self) -> &'static str {
        "DiscreteSampler"
    }

    fn forward_scalar(&self, value: &Scalar) -> Result<Value> {
        let index = self.index_arg(value, Direction::Forward, &Value::Scalar(*value))?;
        Ok(self.duration_of(index)?.into())
    }

    fn backward_scalar(&self, value: &Scalar) -> Result<Value> {
        let d = self.duration_arg(value, Direction::Backward, &Value::Scalar(*value))?;
        Ok(self.index_of(&d)?.into())
    }

    /// Unit-step ranges cover a contiguous span and come back as an
    /// interval; other steps stay ranges with the step scaled to time.
    fn forward_range(&self, value: &Range) -> Result<Value> {
        let v = Value::Range(*value);
        let (start, step, stop) = value
            .index_bounds()
            .ok_or_else(|| self.unsupported(Direction::Forward, &v))?;

        let lo = self.duration_of(start)?;
        let hi = self.duration_of(stop)?;
        if step == 1 {
            return Ok(Interval::new(lo, hi).into());
        }

        let step_ms = step as f64 * 1000.0 / self.rate;
        let step = exact_millis(step_ms)?.ok_or_else(|| {
            Error::SubMillisecondPrecision(Duration::nanoseconds((step_ms * 1e6).round() as i64))
        })?;
        Ok(Range::new(lo, from_millis(step)?, hi).into())
    }

    fn backward_interval(&self, value: &Interval) -> Result<Value> {
        let v = Value::Interval(*value);
        let lo = self.duration_arg(&value.lo, Direction::Backward, &v)?;
        let hi = self.duration_arg(&value.hi, Direction::Backward, &v)?;
        Ok(Range::indices(self.index_of(&lo)?, self.index_of(&hi)?).into())
    }
}
