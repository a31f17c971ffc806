//! Sampler construction from argument types, and translation between two
//! coordinate systems that share a base.
//!
//! ```ignore
//! use timebase::factory::{sampler, Hz};
//!
//! let time = sampler(epoch)?;                     // TimeSampler
//! let index = sampler((epoch, Hz(250.0)))?;       // timestamp <- index
//! let events = sampler((epoch, Hz(250.0), pos))?; // timestamp <- index <- event
//! ```

use chrono::{DateTime, Utc};

use crate::core::{Sampler, Value};
use crate::sampler::{AnySampler, DiscreteSampler, EventSampler, Position, SamplingChain, TimeSampler};
use crate::util::{Error, Result};

/// Sampling rate in Hz.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Hz(pub f64);

/// Argument sets that select a sampler or chain.
pub trait IntoSampler {
    fn into_sampler(self) -> Result<AnySampler>;
}

impl IntoSampler for DateTime<Utc> {
    fn into_sampler(self) -> Result<AnySampler> {
        Ok(TimeSampler::new(self).into())
    }
}

impl IntoSampler for Hz {
    fn into_sampler(self) -> Result<AnySampler> {
        Ok(DiscreteSampler::new(self.0)?.into())
    }
}

impl IntoSampler for (DateTime<Utc>, Hz) {
    fn into_sampler(self) -> Result<AnySampler> {
        let (epoch, rate) = self;
        Ok(SamplingChain::pair(TimeSampler::new(epoch), DiscreteSampler::new(rate.0)?).into())
    }
}

impl IntoSampler for (Hz, Vec<Position>) {
    fn into_sampler(self) -> Result<AnySampler> {
        let (rate, events) = self;
        Ok(SamplingChain::pair(DiscreteSampler::new(rate.0)?, EventSampler::new(events)?).into())
    }
}

impl IntoSampler for (DateTime<Utc>, Hz, Vec<Position>) {
    fn into_sampler(self) -> Result<AnySampler> {
        let (epoch, rate, events) = self;
        Ok(SamplingChain::pair(TimeSampler::new(epoch), DiscreteSampler::new(rate.0)?)
            .then(EventSampler::new(events)?)
            .into())
    }
}

/// Build the sampler matching `args`.
pub fn sampler<A: IntoSampler>(args: A) -> Result<AnySampler> {
    args.into_sampler()
}

/// Map each value through `from.forward` then `to.backward`.
fn translate(values: &[Value], from: &AnySampler, to: &AnySampler) -> Result<Vec<Value>> {
    values
        .iter()
        .map(|v| to.backward(&from.forward(v)?))
        .collect()
}

/// Re-express sample indices of the `(epoch, rate)` system `from` as indices
/// of the system `to`. Both systems meet in absolute time.
pub fn translate_index(indices: &[i64], from: (DateTime<Utc>, Hz), to: (DateTime<Utc>, Hz)) -> Result<Vec<i64>> {
    let src = sampler(from)?;
    let dst = sampler(to)?;
    let values: Vec<Value> = indices.iter().copied().map(Value::from).collect();
    translate(&values, &src, &dst)?
        .into_iter()
        .map(|v| {
            v.as_index()
                .ok_or_else(|| Error::unsupported(dst.name(), "backward", v.describe()))
        })
        .collect()
}

/// Re-express durations (scalars, intervals or ranges) relative to epoch
/// `from` as durations relative to epoch `to`.
pub fn translate_periods(periods: &[Value], from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Value>> {
    translate(periods, &sampler(from)?, &sampler(to)?)
}
