//! Absolute timestamps relative to a fixed epoch.

use chrono::{DateTime, Duration, Utc};

use crate::core::{Direction, Interval, Range, Sampler, Scalar, Value};
use crate::util::millis::{from_millis, to_millis};
use crate::util::{Error, Result};

/// Timestamp (base) <-> duration since `epoch` (self).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSampler {
    epoch: DateTime<Utc>,
}

impl TimeSampler {
    pub fn new(epoch: DateTime<Utc>) -> Self {
        tracing::debug!(%epoch, "TimeSampler");
        Self { epoch }
    }

    #[inline]
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Timestamp `epoch + d`.
    pub fn timestamp_at(&self, d: &Duration) -> Result<DateTime<Utc>> {
        let ms = to_millis(d)?;
        self.epoch
            .checked_add_signed(from_millis(ms)?)
            .ok_or_else(|| Error::invalid(format!("{}ms past {} overflows timestamp range", ms, self.epoch)))
    }

    /// Duration `t - epoch`.
    pub fn elapsed(&self, t: &DateTime<Utc>) -> Result<Duration> {
        let d = t.signed_duration_since(self.epoch);
        from_millis(to_millis(&d)?)
    }

    fn to_time(&self, s: &Scalar, value: &Value) -> Result<Scalar> {
        match s {
            Scalar::Duration(d) => Ok(Scalar::Time(self.timestamp_at(d)?)),
            _ => Err(self.unsupported(Direction::Forward, value)),
        }
    }

    fn to_duration(&self, s: &Scalar, value: &Value) -> Result<Scalar> {
        match s {
            Scalar::Time(t) => Ok(Scalar::Duration(self.elapsed(t)?)),
            _ => Err(self.unsupported(Direction::Backward, value)),
        }
    }

    /// Ranges keep their step, which must already be a whole-millisecond
    /// duration.
    fn check_step(&self, r: &Range, direction: Direction) -> Result<()> {
        match r.step {
            Scalar::Duration(d) => to_millis(&d).map(|_| ()),
            _ => Err(self.unsupported(direction, &Value::Range(*r))),
        }
    }
}

impl Sampler for TimeSampler {
    fn name(&self) -> &'static str {
        "TimeSampler"
    }

    fn forward_scalar(&self, value: &Scalar) -> Result<Value> {
        Ok(self.to_time(value, &Value::Scalar(*value))?.into())
    }

    fn backward_scalar(&self, value: &Scalar) -> Result<Value> {
        Ok(self.to_duration(value, &Value::Scalar(*value))?.into())
    }

    fn forward_interval(&self, value: &Interval) -> Result<Value> {
        let v = Value::Interval(*value);
        Ok(Interval::new(self.to_time(&value.lo, &v)?, self.to_time(&value.hi, &v)?).into())
    }

    fn backward_interval(&self, value: &Interval) -> Result<Value> {
        let v = Value::Interval(*value);
        Ok(Interval::new(self.to_duration(&value.lo, &v)?, self.to_duration(&value.hi, &v)?).into())
    }

    fn forward_range(&self, value: &Range) -> Result<Value> {
        self.check_step(value, Direction::Forward)?;
        let v = Value::Range(*value);
        Ok(Range::new(self.to_time(&value.start, &v)?, value.step, self.to_time(&value.stop, &v)?).into())
    }

    fn backward_range(&self, value: &Range) -> Result<Value> {
        self.check_step(value, Direction::Backward)?;
        let v = Value::Range(*value);
        Ok(Range::new(self.to_duration(&value.start, &v)?, value.step, self.to_duration(&value.stop, &v)?).into())
    }
}
