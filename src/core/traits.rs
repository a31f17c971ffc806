//! The sampler conversion contract.
//!
//! Every sampler converts between its own coordinate space and the space of
//! its base (parent) sampler:
//! - `forward`: self space -> base space
//! - `backward`: base space -> self space
//!
//! Implementors provide the scalar rules and whichever interval/range rules
//! they support. The provided [`Sampler::forward`] and [`Sampler::backward`]
//! resolve the input shape in a fixed order: vectors element by element,
//! then intervals, then ranges, then scalars.

use std::fmt;

use super::value::{Interval, Range, Scalar, Value};
use crate::util::{Error, Result};

/// Vectors at least this long are converted on the rayon pool.
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Direction of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Self space to base space.
    Forward,
    /// Base space to self space.
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bidirectional, stateless coordinate conversion.
pub trait Sampler: Send + Sync {
    /// Sampler kind, as reported in errors.
    fn name(&self) -> &'static str;

    /// Scalar rule, self space -> base space.
    fn forward_scalar(&self, value: &Scalar) -> Result<Value>;

    /// Scalar rule, base space -> self space.
    fn backward_scalar(&self, value: &Scalar) -> Result<Value>;

    fn forward_interval(&self, value: &Interval) -> Result<Value> {
        Err(self.unsupported(Direction::Forward, &Value::Interval(*value)))
    }

    fn forward_range(&self, value: &Range) -> Result<Value> {
        Err(self.unsupported(Direction::Forward, &Value::Range(*value)))
    }

    fn backward_interval(&self, value: &Interval) -> Result<Value> {
        Err(self.unsupported(Direction::Backward, &Value::Interval(*value)))
    }

    fn backward_range(&self, value: &Range) -> Result<Value> {
        Err(self.unsupported(Direction::Backward, &Value::Range(*value)))
    }

    /// Convert a self-space value to base space.
    fn forward(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Vector(items) => elementwise(items, |item| self.forward(item)),
            Value::Interval(iv) => self.forward_interval(iv),
            Value::Range(r) => self.forward_range(r),
            Value::Scalar(s) => self.forward_scalar(s),
        }
    }

    /// Convert a base-space value to self space.
    fn backward(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Vector(items) => elementwise(items, |item| self.backward(item)),
            Value::Interval(iv) => self.backward_interval(iv),
            Value::Range(r) => self.backward_range(r),
            Value::Scalar(s) => self.backward_scalar(s),
        }
    }

    /// Build the error for an undefined direction/shape combination.
    fn unsupported(&self, direction: Direction, value: &Value) -> Error {
        Error::unsupported(self.name(), direction.as_str(), value.describe())
    }
}

/// Apply `f` to every element, preserving order and length.
pub fn elementwise<F>(items: &[Value], f: F) -> Result<Value>
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    #[cfg(feature = "parallel")]
    if items.len() >= PARALLEL_THRESHOLD {
        use rayon::prelude::*;
        return items
            .par_iter()
            .map(|item| f(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Vector);
    }

    items
        .iter()
        .map(|item| f(item))
        .collect::<Result<Vec<_>>>()
        .map(Value::Vector)
}
