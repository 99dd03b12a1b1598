//! Occupancy segmentation of a single day.
//!
//! Cuts a day at every commitment boundary, classifies each resulting
//! micro-interval from the commitments covering it, then merges neighbours that
//! share a classification. The output is ordered, gap-free and covers exactly
//! `[day start, day end)`.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{self, ClassificationContext, SegmentClass};
use crate::commitment::Commitment;
use crate::interval::{self, Interval};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A maximal stretch of a day sharing one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub interval: Interval,
    pub is_occupied: bool,
    pub classification: SegmentClass,
}

impl Segment {
    fn new(interval: Interval, classification: SegmentClass) -> Self {
        Self {
            interval,
            is_occupied: classification.is_occupied(),
            classification,
        }
    }

    /// Fraction of the 24-hour day this segment spans, for proportional rendering.
    pub fn weight_in_day(&self) -> f64 {
        self.interval.duration().num_seconds() as f64 / SECONDS_PER_DAY
    }
}

/// Segments for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOccupancy {
    pub date: NaiveDate,
    pub segments: Vec<Segment>,
}

/// Segment `date` against the commitment corpus.
///
/// The corpus may include commitments on other days; only the parts that fall
/// within `date` are considered. An empty day yields a single `Free` segment.
/// The last representable date has no end and yields no segments.
pub fn segment_day(
    date: NaiveDate,
    commitments: &[Commitment],
    ctx: &ClassificationContext,
) -> Vec<Segment> {
    let Some(day) = interval::day_bounds(date) else {
        return Vec::new();
    };

    let clipped: Vec<(Interval, &Commitment)> = commitments
        .iter()
        .filter_map(|c| interval::clamp_to_day(&c.interval, date).map(|iv| (iv, c)))
        .collect();

    let mut breakpoints: Vec<DateTime<Utc>> = Vec::with_capacity(clipped.len() * 2 + 2);
    breakpoints.push(day.start());
    breakpoints.push(day.end());
    for (iv, _) in &clipped {
        breakpoints.push(iv.start());
        breakpoints.push(iv.end());
    }
    breakpoints.sort();
    breakpoints.dedup();

    let mut segments: Vec<Segment> = Vec::new();
    for pair in breakpoints.windows(2) {
        // Sorted and deduplicated, so every pair is strictly increasing.
        let Ok(micro) = Interval::new(pair[0], pair[1]) else {
            continue;
        };

        let covering: Vec<&Commitment> = clipped
            .iter()
            .filter(|(iv, _)| iv.contains(&micro))
            .map(|(_, c)| *c)
            .collect();
        let class = classify::resolve(&covering, ctx);

        match segments.last_mut() {
            Some(last) if last.classification == class => {
                last.interval = last.interval.hull(&micro);
            }
            _ => segments.push(Segment::new(micro, class)),
        }
    }

    tracing::debug!(
        %date,
        commitments = clipped.len(),
        segments = segments.len(),
        "segmented day"
    );

    segments
}

/// Segment `days` consecutive dates starting at `start`.
///
/// A zero or negative day count yields no days.
pub fn segment_days(
    start: NaiveDate,
    days: i64,
    commitments: &[Commitment],
    ctx: &ClassificationContext,
) -> Vec<DayOccupancy> {
    dates_from(start, days)
        .map(|date| DayOccupancy {
            date,
            segments: segment_day(date, commitments, ctx),
        })
        .collect()
}

/// Iterate `days` consecutive dates from `start`, stopping early at the last
/// date that still has a following midnight.
pub(crate) fn dates_from(start: NaiveDate, days: i64) -> impl Iterator<Item = NaiveDate> {
    let count = u64::try_from(days).unwrap_or(0);
    (0..count)
        .map_while(move |offset| start.checked_add_days(Days::new(offset)))
        .take_while(|date| date.succ_opt().is_some())
}
