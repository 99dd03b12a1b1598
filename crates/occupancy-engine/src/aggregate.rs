//! Per-day free/busy totals for calendar-grid display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::freeslot::FreeSlot;
use crate::interval::{self, Interval};
use crate::segment::Segment;

/// Free-time summary of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFreeTime {
    pub date: NaiveDate,
    /// The day's `Free` segments, unmerged and unaltered.
    pub free_slots: Vec<FreeSlot>,
    /// Sum of free segment durations in hours, not rounded.
    pub total_free_hours: f64,
    /// Sum of occupied segment durations in hours, not rounded.
    pub total_busy_hours: f64,
    pub has_free_time: bool,
}

/// Reduce a day's segment list into its free-time summary.
pub fn summarize_day(date: NaiveDate, segments: &[Segment]) -> DailyFreeTime {
    summarize(date, segments.iter().map(|s| (s.interval, s.is_occupied)))
}

/// Like [`summarize_day`], counting only the parts of segments inside `window`.
pub fn summarize_day_within(
    date: NaiveDate,
    segments: &[Segment],
    window: &Interval,
) -> DailyFreeTime {
    summarize(
        date,
        segments.iter().filter_map(|s| {
            interval::intersect(&s.interval, window).map(|iv| (iv, s.is_occupied))
        }),
    )
}

fn summarize(date: NaiveDate, parts: impl Iterator<Item = (Interval, bool)>) -> DailyFreeTime {
    let mut free_slots = Vec::new();
    let mut total_free_hours = 0.0;
    let mut total_busy_hours = 0.0;

    for (iv, occupied) in parts {
        if occupied {
            total_busy_hours += iv.duration_hours();
        } else {
            total_free_hours += iv.duration_hours();
            free_slots.push(FreeSlot::from_interval(iv));
        }
    }

    DailyFreeTime {
        date,
        free_slots,
        total_free_hours,
        total_busy_hours,
        has_free_time: total_free_hours > 0.0,
    }
}
