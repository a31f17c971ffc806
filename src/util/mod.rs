//! Utility types and functions shared by every sampler.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`millis`] - Whole-millisecond reduction of durations

mod error;
pub mod millis;

pub use error::*;
