//! Sparse events addressed by ordinal.
//!
//! Events are stored sorted. Looking an ordinal up (`forward`) returns the
//! event position; searching (`backward`) returns the ordinal range of all
//! events that touch a query. An empty result comes back as `k:k-1`.

use crate::core::{Direction, Interval, Range, Sampler, Scalar, Value};
use crate::util::{Error, Result};

/// Stored event position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Single index or time.
    Point(Scalar),
    /// Closed segment `[start, end]`.
    Span(Scalar, Scalar),
}

impl Position {
    #[inline]
    pub fn point(at: impl Into<Scalar>) -> Self {
        Self::Point(at.into())
    }

    #[inline]
    pub fn span(start: impl Into<Scalar>, end: impl Into<Scalar>) -> Self {
        Self::Span(start.into(), end.into())
    }

    #[inline]
    pub fn start(&self) -> Scalar {
        match self {
            Self::Point(s) | Self::Span(s, _) => *s,
        }
    }

    #[inline]
    pub fn end(&self) -> Scalar {
        match self {
            Self::Point(s) | Self::Span(_, s) => *s,
        }
    }

    /// The position as a base-space value. Index segments become unit-step
    /// ranges; other segments become intervals.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Point(s) => Value::Scalar(*s),
            Self::Span(Scalar::Index(a), Scalar::Index(b)) => Range::indices(*a, *b).into(),
            Self::Span(a, b) => Interval::new(*a, *b).into(),
        }
    }
}

/// Base position <-> event ordinal (self).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventSampler {
    positions: Vec<Position>,
}

impl EventSampler {
    /// Create from positions sorted by start. Positions must share one
    /// scalar kind and must not nest.
    // Segments are matched by overlap only; a segment whose end falls inside
    // a later decimation window is not realigned to that window's edge.
    pub fn new(positions: Vec<Position>) -> Result<Self> {
        if let Some(first) = positions.first() {
            let kind = first.start();
            for (i, p) in positions.iter().enumerate() {
                if !p.start().same_kind(&kind) || !p.end().same_kind(&kind) {
                    return Err(Error::invalid(format!(
                        "event {} is a {}, expected {}",
                        i + 1,
                        p.start().kind_name(),
                        kind.kind_name()
                    )));
                }
                if p.end() < p.start() {
                    return Err(Error::invalid(format!("event {} ends before it starts", i + 1)));
                }
            }
            for (i, pair) in positions.windows(2).enumerate() {
                if pair[1].start() < pair[0].start() {
                    return Err(Error::invalid(format!("event {} starts before event {}", i + 2, i + 1)));
                }
                if pair[1].end() < pair[0].end() {
                    return Err(Error::invalid(format!("event {} is nested inside event {}", i + 2, i + 1)));
                }
            }
        }
        tracing::debug!(count = positions.len(), "EventSampler");
        Ok(Self { positions })
    }

    /// Events at single positions.
    pub fn points<I, S>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Self::new(points.into_iter().map(Position::point).collect())
    }

    /// Events covering closed segments.
    pub fn spans<I, S>(spans: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<Scalar>,
    {
        Self::new(spans.into_iter().map(|(a, b)| Position::span(a, b)).collect())
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of the event with 1-based `ordinal`.
    pub fn get(&self, ordinal: i64) -> Result<&Position> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|k| k.checked_sub(1))
            .and_then(|k| self.positions.get(k))
            .ok_or(Error::OutOfRange {
                index: ordinal,
                count: self.positions.len(),
            })
    }

    /// Ordinals `first..=last` of events intersecting `[lo, hi]`.
    ///
    /// `first` is the first event ending at or after `lo`, `last` the last
    /// event starting at or before `hi`. No match gives `last < first`.
    pub fn search(&self, lo: &Scalar, hi: &Scalar) -> (i64, i64) {
        let first = self.positions.partition_point(|p| p.end() < *lo) + 1;
        let last = self.positions.partition_point(|p| p.start() <= *hi);
        (first as i64, last as i64)
    }

    fn query(&self, lo: &Scalar, hi: &Scalar, value: &Value) -> Result<Value> {
        if let Some(p) = self.positions.first() {
            let kind = p.start();
            if !lo.same_kind(&kind) || !hi.same_kind(&kind) {
                return Err(self.unsupported(Direction::Backward, value));
            }
        }
        let (first, last) = self.search(lo, hi);
        Ok(Range::indices(first, last).into())
    }
}

impl Sampler for EventSampler {
    fn name(&self) -> &'static str {
        "EventSampler"
    }

    fn forward_scalar(&self, value: &Scalar) -> Result<Value> {
        let ordinal = value
            .as_index()
            .ok_or_else(|| self.unsupported(Direction::Forward, &Value::Scalar(*value)))?;
        Ok(self.get(ordinal)?.to_value())
    }

    /// Ordinal ranges expand to the vector of addressed positions.
    fn forward_range(&self, value: &Range) -> Result<Value> {
        let unsupported = || self.unsupported(Direction::Forward, &Value::Range(*value));
        let (start, _, _) = value.index_bounds().ok_or_else(unsupported)?;
        // Both ends must be valid ordinals before anything is expanded.
        if let Some(last) = value.last_index() {
            self.get(start)?;
            self.get(last)?;
        }
        let ordinals = value.index_values().ok_or_else(unsupported)?;
        ordinals
            .into_iter()
            .map(|k| self.get(k).map(Position::to_value))
            .collect::<Result<Vec<_>>>()
            .map(Value::Vector)
    }

    fn backward_scalar(&self, value: &Scalar) -> Result<Value> {
        self.query(value, value, &Value::Scalar(*value))
    }

    fn backward_interval(&self, value: &Interval) -> Result<Value> {
        self.query(&value.lo, &value.hi, &Value::Interval(*value))
    }

    fn backward_range(&self, value: &Range) -> Result<Value> {
        self.query(&value.start, &value.stop, &Value::Range(*value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> EventSampler {
        EventSampler::points([123i64, 321, 555]).unwrap()
    }

    #[test]
    fn test_forward_lookup() {
        let es = events();
        assert_eq!(es.forward(&Value::from(2i64)).unwrap(), Value::from(321i64));
        assert_eq!(es.forward(&Value::indices([3, 1])).unwrap(), Value::indices([555, 123]));
        assert_eq!(es.forward(&Range::indices(1, 2).into()).unwrap(), Value::indices([123, 321]));
    }

    #[test]
    fn test_forward_out_of_range() {
        let es = events();
        for k in [0i64, 4, -1] {
            match es.forward(&Value::from(k)) {
                Err(Error::OutOfRange { index, count }) => {
                    assert_eq!(index, k);
                    assert_eq!(count, 3);
                }
                other => panic!("expected OutOfRange, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_forward_range_checks_bounds_first() {
        let es = events();
        assert!(matches!(
            es.forward(&Range::indices(1, i64::MAX).into()),
            Err(Error::OutOfRange { index: i64::MAX, count: 3 })
        ));
        assert!(matches!(
            es.forward(&Range::indices(i64::MIN, 2).into()),
            Err(Error::OutOfRange { index: i64::MIN, count: 3 })
        ));
        assert_eq!(
            es.forward(&Range::new(3i64, -2i64, 1i64).into()).unwrap(),
            Value::indices([555, 123])
        );
        assert_eq!(es.forward(&Range::indices(5, 4).into()).unwrap(), Value::Vector(vec![]));
    }

    #[test]
    fn test_backward_search() {
        let es = events();
        assert_eq!(es.backward(&Value::from(200i64)).unwrap(), Value::from(Range::indices(2, 1)));
        assert_eq!(es.backward(&Value::from(321i64)).unwrap(), Value::from(Range::indices(2, 2)));
        assert_eq!(
            es.backward(&Range::indices(100, 350).into()).unwrap(),
            Value::from(Range::indices(1, 2))
        );
        assert_eq!(
            es.backward(&Interval::new(0i64, 1000i64).into()).unwrap(),
            Value::from(Range::indices(1, 3))
        );
        assert_eq!(es.backward(&Value::from(600i64)).unwrap(), Value::from(Range::indices(4, 3)));
        assert_eq!(es.backward(&Value::from(1i64)).unwrap(), Value::from(Range::indices(1, 0)));
    }

    #[test]
    fn test_empty_match_is_not_an_error() {
        let es = events();
        let out = es.backward(&Value::from(200i64)).unwrap();
        assert!(out.as_range().unwrap().is_empty());

        let none = EventSampler::default();
        let out = none.backward(&Value::from(5i64)).unwrap();
        assert_eq!(out, Value::from(Range::indices(1, 0)));
    }

    #[test]
    fn test_segments() {
        let es = EventSampler::spans([(10i64, 20i64), (30, 45), (50, 60)]).unwrap();
        assert_eq!(es.forward(&Value::from(2i64)).unwrap(), Value::from(Range::indices(30, 45)));
        assert_eq!(
            es.backward(&Interval::new(15i64, 35i64).into()).unwrap(),
            Value::from(Range::indices(1, 2))
        );
        assert_eq!(
            es.backward(&Interval::new(21i64, 29i64).into()).unwrap(),
            Value::from(Range::indices(2, 1))
        );
        assert_eq!(es.backward(&Value::from(45i64)).unwrap(), Value::from(Range::indices(2, 2)));
    }

    #[test]
    fn test_time_segments() {
        use chrono::Duration;
        let es = EventSampler::spans([(Duration::seconds(1), Duration::seconds(2))]).unwrap();
        assert_eq!(
            es.forward(&Value::from(1i64)).unwrap(),
            Value::from(Interval::new(Duration::seconds(1), Duration::seconds(2)))
        );
        assert!(es.backward(&Value::from(3i64)).is_err());
    }

    #[test]
    fn test_invalid_positions() {
        assert!(EventSampler::points([5i64, 3]).is_err());
        assert!(EventSampler::spans([(1i64, 10i64), (2, 5)]).is_err());
        assert!(EventSampler::spans([(5i64, 1i64)]).is_err());
        assert!(EventSampler::new(vec![
            Position::point(1i64),
            Position::point(chrono::Duration::zero()),
        ])
        .is_err());
    }
}
