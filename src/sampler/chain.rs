//! Multi-stage composition of samplers.

use crate::core::{elementwise, Interval, Range, Sampler, Scalar, Value};
use crate::util::{Error, Result};

use super::AnySampler;

/// Ordered stages `[parent, ..., self]` acting as one sampler.
///
/// `backward` runs the stages parent first; `forward` runs them in the
/// mirror order, innermost stage first.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingChain {
    stages: Vec<AnySampler>,
}

impl SamplingChain {
    /// Create a chain from at least two stages, parent first.
    pub fn new(stages: Vec<AnySampler>) -> Result<Self> {
        if stages.len() < 2 {
            return Err(Error::invalid(format!(
                "a sampling chain needs at least 2 stages, got {}",
                stages.len()
            )));
        }
        tracing::debug!(
            stages = ?stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "SamplingChain"
        );
        Ok(Self { stages })
    }

    /// Two-stage chain `parent -> child`.
    pub fn pair(parent: impl Into<AnySampler>, child: impl Into<AnySampler>) -> Self {
        Self {
            stages: vec![parent.into(), child.into()],
        }
    }

    /// Append a stage below the current innermost one.
    pub fn push(&mut self, stage: impl Into<AnySampler>) {
        self.stages.push(stage.into());
    }

    /// Builder form of [`push`](Self::push).
    pub fn then(mut self, stage: impl Into<AnySampler>) -> Self {
        self.push(stage);
        self
    }

    #[inline]
    pub fn stages(&self) -> &[AnySampler] {
        &self.stages
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    fn thread_forward(&self, value: Value) -> Result<Value> {
        self.stages.iter().rev().try_fold(value, |acc, stage| {
            tracing::trace!(stage = stage.name(), input = %acc.describe(), "forward");
            stage.forward(&acc)
        })
    }

    fn thread_backward(&self, value: Value) -> Result<Value> {
        self.stages.iter().try_fold(value, |acc, stage| {
            tracing::trace!(stage = stage.name(), input = %acc.describe(), "backward");
            stage.backward(&acc)
        })
    }
}

impl Sampler for SamplingChain {
    fn name(&self) -> &'static str {
        "SamplingChain"
    }

    fn forward_scalar(&self, value: &Scalar) -> Result<Value> {
        self.thread_forward(Value::Scalar(*value))
    }

    fn backward_scalar(&self, value: &Scalar) -> Result<Value> {
        self.thread_backward(Value::Scalar(*value))
    }

    fn forward_interval(&self, value: &Interval) -> Result<Value> {
        self.thread_forward(Value::Interval(*value))
    }

    fn backward_interval(&self, value: &Interval) -> Result<Value> {
        self.thread_backward(Value::Interval(*value))
    }

    fn forward_range(&self, value: &Range) -> Result<Value> {
        self.thread_forward(Value::Range(*value))
    }

    fn backward_range(&self, value: &Range) -> Result<Value> {
        self.thread_backward(Value::Range(*value))
    }

    /// A vector is always taken element by element through the whole chain.
    fn forward(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Vector(items) => elementwise(items, |item| self.forward(item)),
            other => self.thread_forward(other.clone()),
        }
    }

    fn backward(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Vector(items) => elementwise(items, |item| self.backward(item)),
            other => self.thread_backward(other.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{Alignment, DiscreteSampler, DownSampler, EventSampler, ShiftSampler};

    #[test]
    fn test_stage_order() {
        // forward: shift first, then decimation
        let chain = SamplingChain::pair(
            DownSampler::new(10.0, Alignment::Left).unwrap(),
            ShiftSampler::new(1.0).unwrap(),
        );
        assert_eq!(chain.forward(&Value::from(1i64)).unwrap(), Value::from(11i64));
        assert_eq!(chain.backward(&Value::from(11i64)).unwrap(), Value::from(1i64));
    }

    #[test]
    fn test_events_through_decimation() {
        let chain = SamplingChain::new(vec![
            DownSampler::new(20.0, Alignment::Left).unwrap().into(),
            EventSampler::points([1i64, 51, 501]).unwrap().into(),
        ])
        .unwrap();
        assert_eq!(
            chain.forward(&Value::indices([1, 2, 3])).unwrap(),
            Value::indices([1, 1001, 10001])
        );
        assert_eq!(
            chain.backward(&Range::indices(1, 1020).into()).unwrap(),
            Value::from(Range::indices(1, 2))
        );
    }

    #[test]
    fn test_interval_through_chain() {
        let chain = SamplingChain::pair(
            DiscreteSampler::new(250.0).unwrap(),
            DownSampler::new(2.0, Alignment::Left).unwrap(),
        );
        let iv = Interval::new(chrono::Duration::zero(), chrono::Duration::milliseconds(15));
        assert_eq!(chain.backward(&iv.into()).unwrap(), Value::from(Range::indices(1, 2)));
    }

    #[test]
    fn test_too_short() {
        assert!(SamplingChain::new(vec![]).is_err());
        assert!(SamplingChain::new(vec![ShiftSampler::new(1.0).unwrap().into()]).is_err());
    }
}
