//! Concrete samplers.
//!
//! - [`TimeSampler`] - timestamp <-> duration from an epoch
//! - [`DiscreteSampler`] - duration <-> 1-based index at a fixed rate
//! - [`DownSampler`] - dense index <-> decimated index
//! - [`ShiftSampler`] - index <-> index shifted by a constant
//! - [`EventSampler`] - position <-> event ordinal
//! - [`SamplingChain`] - composition of two or more samplers
//!
//! [`AnySampler`] holds any of them, which is what chains store.

mod chain;
mod discrete;
mod down;
mod event;
mod shift;
mod time;

pub use chain::SamplingChain;
pub use discrete::DiscreteSampler;
pub use down::{Alignment, DownSampler};
pub use event::{EventSampler, Position};
pub use shift::ShiftSampler;
pub use time::TimeSampler;

use crate::core::{Interval, Range, Sampler, Scalar, Value};
use crate::util::Result;

/// Any sampler variant.
#[derive(Clone, Debug, PartialEq)]
pub enum AnySampler {
    Time(TimeSampler),
    Discrete(DiscreteSampler),
    Down(DownSampler),
    Shift(ShiftSampler),
    Event(EventSampler),
    Chain(SamplingChain),
}

impl AnySampler {
    /// Chain `next` below this sampler. Chaining onto a chain appends a stage.
    pub fn then(self, next: impl Into<AnySampler>) -> SamplingChain {
        match self {
            Self::Chain(mut chain) => {
                chain.push(next);
                chain
            }
            other => SamplingChain::pair(other, next),
        }
    }

    fn inner(&self) -> &dyn Sampler {
        match self {
            Self::Time(s) => s,
            Self::Discrete(s) => s,
            Self::Down(s) => s,
            Self::Shift(s) => s,
            Self::Event(s) => s,
            Self::Chain(s) => s,
        }
    }
}

impl Sampler for AnySampler {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn forward_scalar(&self, value: &Scalar) -> Result<Value> {
        self.inner().forward_scalar(value)
    }

    fn backward_scalar(&self, value: &Scalar) -> Result<Value> {
        self.inner().backward_scalar(value)
    }

    fn forward_interval(&self, value: &Interval) -> Result<Value> {
        self.inner().forward_interval(value)
    }

    fn forward_range(&self, value: &Range) -> Result<Value> {
        self.inner().forward_range(value)
    }

    fn backward_interval(&self, value: &Interval) -> Result<Value> {
        self.inner().backward_interval(value)
    }

    fn backward_range(&self, value: &Range) -> Result<Value> {
        self.inner().backward_range(value)
    }

    fn forward(&self, value: &Value) -> Result<Value> {
        self.inner().forward(value)
    }

    fn backward(&self, value: &Value) -> Result<Value> {
        self.inner().backward(value)
    }
}

impl From<TimeSampler> for AnySampler {
    fn from(s: TimeSampler) -> Self {
        Self::Time(s)
    }
}

impl From<DiscreteSampler> for AnySampler {
    fn from(s: DiscreteSampler) -> Self {
        Self::Discrete(s)
    }
}

impl From<DownSampler> for AnySampler {
    fn from(s: DownSampler) -> Self {
        Self::Down(s)
    }
}

impl From<ShiftSampler> for AnySampler {
    fn from(s: ShiftSampler) -> Self {
        Self::Shift(s)
    }
}

impl From<EventSampler> for AnySampler {
    fn from(s: EventSampler) -> Self {
        Self::Event(s)
    }
}

impl From<SamplingChain> for AnySampler {
    fn from(s: SamplingChain) -> Self {
        Self::Chain(s)
    }
}
