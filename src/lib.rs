//! # Timebase
//!
//! Composable conversions between the representations of "time" used in
//! signal-processing pipelines: absolute timestamps, durations from an
//! epoch, uniformly sampled indices, decimated indices, shifted indices and
//! sparse event ordinals.
//!
//! Every sampler converts in two directions:
//! - `forward`: from its own coordinate space to its base (parent) space
//! - `backward`: from the base space into its own space
//!
//! Samplers chain, so an event ordinal can be walked out to a timestamp
//! through several discretizations, and a time window walked back in to the
//! ordinals of the events it touches.
//!
//! ## Modules
//!
//! - [`util`] - Errors and millisecond arithmetic
//! - [`core`] - Value shapes and the [`Sampler`] trait
//! - [`sampler`] - Concrete samplers and [`SamplingChain`]
//! - [`factory`] - Type-directed construction and translate helpers
//! - [`config`] - JSON sampler descriptions
//!
//! ## Example
//!
//! ```ignore
//! use timebase::prelude::*;
//!
//! let chain = AnySampler::from(TimeSampler::new(t0))
//!     .then(DiscreteSampler::new(1000.0)?)
//!     .then(DownSampler::new(20.0, Alignment::Left)?)
//!     .then(EventSampler::points([1i64, 51, 501])?);
//!
//! let times = chain.forward(&Value::indices([1, 2, 3]))?;
//! let hits = chain.backward(&Interval::new(t0, t1).into())?;
//! ```

pub mod util;
pub mod core;
pub mod sampler;
pub mod factory;
pub mod config;

// Re-export commonly used types
pub use util::{Error, Result};
pub use core::{Direction, Interval, Range, Sampler, Scalar, Value};
pub use sampler::{
    Alignment, AnySampler, DiscreteSampler, DownSampler, EventSampler, Position, SamplingChain, ShiftSampler,
    TimeSampler,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::core::{Direction, Interval, Range, Sampler, Scalar, Value};
    pub use crate::sampler::*;
    pub use crate::factory::{sampler, translate_index, translate_periods, Hz, IntoSampler};
    pub use crate::config::SamplerConfig;
}
