//! Indices offset by a constant.

use crate::core::{Direction, Range, Sampler, Scalar, Value};
use crate::util::millis::checked_i64;
use crate::util::{Error, Result};

/// Base index <-> index shifted by `-shift`.
///
/// Both directions floor, so at fractional shifts `forward` and `backward`
/// are not exact inverses of each other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShiftSampler {
    shift: f64,
}

impl ShiftSampler {
    pub fn new(shift: f64) -> Result<Self> {
        if !shift.is_finite() {
            return Err(Error::invalid(format!("shift must be finite, got {}", shift)));
        }
        tracing::debug!(shift, "ShiftSampler");
        Ok(Self { shift })
    }

    #[inline]
    pub fn shift(&self) -> f64 {
        self.shift
    }

    fn shifted(&self, index: i64, by: f64) -> Result<i64> {
        checked_i64((index as f64 + by).floor())
    }

    fn convert_scalar(&self, s: &Scalar, direction: Direction) -> Result<Value> {
        let index = s
            .as_index()
            .ok_or_else(|| self.unsupported(direction, &Value::Scalar(*s)))?;
        Ok(self.shifted(index, self.signed(direction))?.into())
    }

    fn convert_range(&self, r: &Range, direction: Direction) -> Result<Value> {
        let (start, step, stop) = r
            .index_bounds()
            .ok_or_else(|| self.unsupported(direction, &Value::Range(*r)))?;
        let by = self.signed(direction);
        Ok(Range::new(self.shifted(start, by)?, step, self.shifted(stop, by)?).into())
    }

    fn signed(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Forward => self.shift,
            Direction::Backward => -self.shift,
        }
    }
}

impl Sampler for ShiftSampler {
    fn name(&self) -> &'static str {
        "ShiftSampler"
    }

    fn forward_scalar(&self, value: &Scalar) -> Result<Value> {
        self.convert_scalar(value, Direction::Forward)
    }

    fn backward_scalar(&self, value: &Scalar) -> Result<Value> {
        self.convert_scalar(value, Direction::Backward)
    }

    fn forward_range(&self, value: &Range) -> Result<Value> {
        self.convert_range(value, Direction::Forward)
    }

    fn backward_range(&self, value: &Range) -> Result<Value> {
        self.convert_range(value, Direction::Backward)
    }
}
