//! Value shapes consumed and produced by samplers.
//!
//! A conversion input is one of four shapes: a [`Scalar`], a vector of
//! values, a closed [`Interval`], or a stepped [`Range`]. The shape
//! dispatcher in [`Sampler`](super::Sampler) matches on [`Value`] to pick the
//! rule a sampler applies.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// A single coordinate: a sample index, a relative duration, or an
/// absolute timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// Discrete (1-based) sample or event index.
    Index(i64),
    /// Time relative to some epoch.
    Duration(Duration),
    /// Absolute UTC timestamp.
    Time(DateTime<Utc>),
}

impl Scalar {
    /// Name of the scalar kind, as used in shape descriptions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Index(_) => "index",
            Self::Duration(_) => "duration",
            Self::Time(_) => "timestamp",
        }
    }

    /// Check whether two scalars carry the same kind of coordinate.
    #[inline]
    pub fn same_kind(&self, other: &Scalar) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    #[inline]
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Self::Index(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }
}

/// Scalars only order against scalars of the same kind.
impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Index(a), Self::Index(b)) => Some(a.cmp(b)),
            (Self::Duration(a), Self::Duration(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Duration(d) => write!(f, "{}ms", d.num_milliseconds()),
            Self::Time(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<Duration> for Scalar {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Time(t)
    }
}

/// Closed interval `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub lo: Scalar,
    pub hi: Scalar,
}

impl Interval {
    /// Create an interval from its two endpoints.
    #[inline]
    pub fn new(lo: impl Into<Scalar>, hi: impl Into<Scalar>) -> Self {
        Self {
            lo: lo.into(),
            hi: hi.into(),
        }
    }

    /// Check whether a scalar lies inside the interval.
    pub fn contains(&self, value: &Scalar) -> bool {
        self.lo <= *value && *value <= self.hi
    }
}

/// Inclusive stepped range `start:step:stop`.
///
/// Index ranges step by an [`Scalar::Index`]; duration and timestamp ranges
/// step by a [`Scalar::Duration`]. With a positive step, `stop < start`
/// denotes the empty range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: Scalar,
    pub step: Scalar,
    pub stop: Scalar,
}

impl Range {
    /// Create a range from start, step and stop.
    #[inline]
    pub fn new(start: impl Into<Scalar>, step: impl Into<Scalar>, stop: impl Into<Scalar>) -> Self {
        Self {
            start: start.into(),
            step: step.into(),
            stop: stop.into(),
        }
    }

    /// Unit-step index range `start:stop`.
    #[inline]
    pub fn indices(start: i64, stop: i64) -> Self {
        Self::new(start, 1i64, stop)
    }

    /// Check for an index range with step 1.
    #[inline]
    pub fn is_unit_step(&self) -> bool {
        self.step == Scalar::Index(1)
    }

    /// Bounds and step of an index range.
    pub fn index_bounds(&self) -> Option<(i64, i64, i64)> {
        Some((self.start.as_index()?, self.step.as_index()?, self.stop.as_index()?))
    }

    /// Check if the range addresses nothing.
    pub fn is_empty(&self) -> bool {
        match self.index_bounds() {
            Some((start, step, stop)) => {
                step == 0 || (step > 0 && stop < start) || (step < 0 && stop > start)
            }
            None => self.stop < self.start,
        }
    }

    /// Number of elements in an index range. `None` for non-index ranges and
    /// for lengths beyond `usize`.
    pub fn len(&self) -> Option<usize> {
        let (start, step, stop) = self.index_bounds()?;
        if self.is_empty() {
            return Some(0);
        }
        let steps = (i128::from(stop) - i128::from(start)) / i128::from(step);
        usize::try_from(steps).ok()?.checked_add(1)
    }

    /// Last index a non-empty index range addresses.
    pub fn last_index(&self) -> Option<i64> {
        let (start, step, stop) = self.index_bounds()?;
        if self.is_empty() {
            return None;
        }
        let steps = (i128::from(stop) - i128::from(start)) / i128::from(step);
        // lies between start and stop
        i64::try_from(i128::from(start) + steps * i128::from(step)).ok()
    }

    /// Every index an index range addresses, in order. The whole range is
    /// materialized, so callers bound its length first.
    pub fn index_values(&self) -> Option<Vec<i64>> {
        let (start, step, _) = self.index_bounds()?;
        let len = self.len()?;
        Some((0..len as i64).map(|k| start + k * step).collect())
    }
}

/// Any value a sampler converts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Scalar(Scalar),
    /// Ordered sequence, converted element by element.
    Vector(Vec<Value>),
    Interval(Interval),
    Range(Range),
}

impl Value {
    /// Vector of index scalars.
    pub fn indices<I: IntoIterator<Item = i64>>(indices: I) -> Self {
        Self::Vector(indices.into_iter().map(Value::from).collect())
    }

    /// Describe the shape for error messages, e.g. `"interval of index"`.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(s) => format!("scalar {}", s.kind_name()),
            Self::Vector(_) => "vector".to_string(),
            Self::Interval(iv) => format!("interval of {}", iv.lo.kind_name()),
            Self::Range(r) => format!("range of {}", r.start.kind_name()),
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_index(&self) -> Option<i64> {
        self.as_scalar()?.as_index()
    }

    #[inline]
    pub fn as_duration(&self) -> Option<Duration> {
        self.as_scalar()?.as_duration()
    }

    #[inline]
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        self.as_scalar()?.as_time()
    }

    #[inline]
    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            Self::Interval(iv) => Some(iv),
            _ => None,
        }
    }

    #[inline]
    pub fn as_range(&self) -> Option<&Range> {
        match self {
            Self::Range(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vector(&self) -> Option<&[Value]> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<i64> for Value {
    fn from(index: i64) -> Self {
        Self::Scalar(Scalar::Index(index))
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Self::Scalar(Scalar::Duration(d))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Scalar(Scalar::Time(t))
    }
}

impl From<Interval> for Value {
    fn from(iv: Interval) -> Self {
        Self::Interval(iv)
    }
}

impl From<Range> for Value {
    fn from(r: Range) -> Self {
        Self::Range(r)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Vector(v)
    }
}
