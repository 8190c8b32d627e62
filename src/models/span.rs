//! Half-open time intervals.
//!
//! # Overlap Rule
//! Two spans overlap iff `a.start < b.end && b.start < a.end`. Spans that
//! only touch (`a.end == b.start`) do not overlap, so back-to-back
//! operations on one resource are never reported as conflicts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// A time interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Interval start (inclusive).
    pub start: DateTime<Utc>,
    /// Interval end (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    /// Creates a new span. No ordering check; see [`TimeSpan::is_positive`].
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Span length.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Span length in fractional hours.
    #[inline]
    pub fn hours(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / MS_PER_HOUR
    }

    /// Whether `end > start`.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.end > self.start
    }

    /// Whether a timestamp falls within this span.
    #[inline]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two spans overlap. Touching endpoints do not count.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The part of this span inside `window`, if any.
    pub fn clip(&self, window: &Self) -> Option<Self> {
        let start = self.start.max(window.start);
        let end = self.end.min(window.end);
        (end > start).then_some(Self { start, end })
    }

    /// Moves both endpoints by `delta`.
    pub fn shifted(&self, delta: Duration) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 19, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_span_basics() {
        let s = TimeSpan::new(at(9), at(11));
        assert_eq!(s.duration(), Duration::hours(2));
        assert!((s.hours() - 2.0).abs() < 1e-10);
        assert!(s.is_positive());
        assert!(s.contains(at(9)));
        assert!(s.contains(at(10)));
        assert!(!s.contains(at(11))); // exclusive end
    }

    #[test]
    fn test_span_overlap() {
        let a = TimeSpan::new(at(9), at(11));
        let b = TimeSpan::new(at(10), at(12));
        let c = TimeSpan::new(at(11), at(13));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // touching
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_span_clip() {
        let window = TimeSpan::new(at(8), at(12));
        let s = TimeSpan::new(at(10), at(14));
        assert_eq!(s.clip(&window), Some(TimeSpan::new(at(10), at(12))));

        let outside = TimeSpan::new(at(12), at(13));
        assert_eq!(outside.clip(&window), None);
    }

    #[test]
    fn test_span_shifted_and_inverted() {
        let s = TimeSpan::new(at(9), at(10)).shifted(Duration::hours(3));
        assert_eq!(s, TimeSpan::new(at(12), at(13)));

        let inverted = TimeSpan::new(at(10), at(9));
        assert!(!inverted.is_positive());
        assert!(!TimeSpan::new(at(9), at(9)).is_positive());
    }
}
