//! Half-open time intervals and the overlap primitives the rest of the engine
//! is built on.
//!
//! An [`Interval`] covers `[start, end)`. Intervals that merely touch (one ends
//! exactly when the other starts) do NOT overlap.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A non-empty, half-open time interval `[start, end)`.
///
/// The constructor guarantees `start < end`, so every `Interval` in circulation
/// has a positive length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = EngineError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Create an interval, rejecting `start >= end`.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` for zero-length or inverted input.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create an interval of `minutes` length starting at `start`.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` for a non-positive length, or one
    /// that runs past the representable time range.
    pub fn starting_at(start: DateTime<Utc>, minutes: i64) -> Result<Self> {
        let end = Duration::try_minutes(minutes)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or(EngineError::InvalidInterval { start, end: start })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length in whole minutes (truncated).
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Length in fractional hours, not rounded.
    pub fn duration_hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }

    /// True iff `self` fully covers `other`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The smallest interval covering both `self` and `other`.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
///
/// Adjacent intervals (`a.end == b.start`) do not overlap.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.start < b.end && b.start < a.end
}

/// The common part of two intervals, or `None` if it would be empty.
pub fn intersect(a: &Interval, b: &Interval) -> Option<Interval> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    Interval::new(start, end).ok()
}

/// The half-open interval `[date 00:00, date+1 00:00)` in the reference zone.
///
/// `None` for the last representable date, which has no following midnight.
pub fn day_bounds(date: NaiveDate) -> Option<Interval> {
    let next = date.succ_opt()?;
    Some(Interval {
        start: date.and_time(NaiveTime::MIN).and_utc(),
        end: next.and_time(NaiveTime::MIN).and_utc(),
    })
}

/// Clip `interval` to the given calendar day, or `None` if they do not meet.
pub fn clamp_to_day(interval: &Interval, date: NaiveDate) -> Option<Interval> {
    intersect(interval, &day_bounds(date)?)
}
