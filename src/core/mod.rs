//! Core layer - value shapes and the sampler contract.
//!
//! This module provides:
//! - [`Scalar`], [`Interval`], [`Range`], [`Value`] - Input/output shapes
//! - [`Sampler`] - Forward/backward conversion trait with shape dispatch
//! - [`Direction`] - Conversion direction

mod traits;
mod value;

pub use traits::{elementwise, Direction, Sampler};
#[cfg(feature = "parallel")]
pub use traits::PARALLEL_THRESHOLD;
pub use value::{Interval, Range, Scalar, Value};
