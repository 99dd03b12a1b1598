//! Free-slot search across a multi-day horizon.
//!
//! Each day is segmented, its `Free` segments are clipped to the daily activity
//! window, and every free run at least as long as the requested duration yields
//! one suggestion. Suggestions are ranked by date, then by start time of day.
//! Longer or tighter-fitting runs get no preference over earlier ones.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::{self, DailyFreeTime};
use crate::classify::{ClassificationContext, SegmentClass};
use crate::commitment::Commitment;
use crate::config::EngineConfig;
use crate::conflict;
use crate::error::{EngineError, Result};
use crate::interval::{self, Interval};
use crate::segment::{self, dates_from};

/// A free time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub interval: Interval,
    pub duration_minutes: i64,
    pub duration_hours: f64,
}

impl FreeSlot {
    pub fn from_interval(interval: Interval) -> Self {
        Self {
            interval,
            duration_minutes: interval.duration_minutes(),
            duration_hours: interval.duration_hours(),
        }
    }
}

/// Hours of the day the search may place slots in, as `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct ActivityWindow {
    start_hour: u32,
    end_hour: u32,
}

#[derive(Deserialize)]
struct RawWindow {
    #[serde(default)]
    start_hour: u32,
    #[serde(default = "full_day_end")]
    end_hour: u32,
}

fn full_day_end() -> u32 {
    24
}

impl TryFrom<RawWindow> for ActivityWindow {
    type Error = EngineError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        ActivityWindow::new(raw.start_hour, raw.end_hour)
    }
}

impl Default for ActivityWindow {
    fn default() -> Self {
        Self::full_day()
    }
}

impl ActivityWindow {
    /// # Errors
    /// Returns `EngineError::InvalidWindow` unless `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if end_hour > 24 {
            return Err(EngineError::InvalidWindow(format!(
                "end hour {} is past the end of the day",
                end_hour
            )));
        }
        if start_hour >= end_hour {
            return Err(EngineError::InvalidWindow(format!(
                "start hour {} is not before end hour {}",
                start_hour, end_hour
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn full_day() -> Self {
        Self {
            start_hour: 0,
            end_hour: 24,
        }
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// The window as a concrete interval on `date`, or `None` when the day
    /// itself is not representable.
    pub fn on(&self, date: NaiveDate) -> Option<Interval> {
        let day = interval::day_bounds(date)?;
        let start = day.start() + Duration::hours(i64::from(self.start_hour));
        let end = day.start() + Duration::hours(i64::from(self.end_hour));
        // start_hour < end_hour <= 24 is enforced at construction.
        Interval::new(start, end).ok()
    }
}

/// Where inside a qualifying free run the suggested slot is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPlacement {
    /// At the very start of the run.
    #[default]
    EarliestStart,
    /// In the middle of the run, offset rounded down to the minute.
    Centered,
}

/// Parameters of a free-slot search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub duration_minutes: i64,
    pub start_date: NaiveDate,
    pub horizon_days: i64,
    #[serde(default)]
    pub window: ActivityWindow,
    #[serde(default)]
    pub placement: SlotPlacement,
    /// Keep at most this many suggestions after ranking.
    #[serde(default)]
    pub max_suggestions: Option<usize>,
    /// Treat this task's own commitment as free, e.g. when rescheduling it.
    #[serde(default)]
    pub exclude_task_id: Option<String>,
}

impl SearchRequest {
    /// A request using the configured horizon and activity window.
    pub fn new(config: &EngineConfig, duration_minutes: i64, start_date: NaiveDate) -> Self {
        Self {
            duration_minutes,
            start_date,
            horizon_days: config.horizon_days,
            window: config.activity_window,
            placement: SlotPlacement::default(),
            max_suggestions: None,
            exclude_task_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Ranked suggestions: earliest date first, then earliest start.
    pub suggestions: Vec<FreeSlot>,
    /// One summary per day in the horizon, limited to the activity window.
    pub daily: Vec<DailyFreeTime>,
}

/// Search the horizon for free slots of the requested duration.
///
/// A non-positive horizon yields an empty result. A non-positive duration, or
/// one longer than every free run (including durations too large to
/// represent), yields no suggestions while the daily summaries still report
/// the actual free time.
pub fn search_free_slots(commitments: &[Commitment], request: &SearchRequest) -> SearchResult {
    if request.horizon_days <= 0 {
        return SearchResult::default();
    }

    let corpus: Vec<Commitment> = match request.exclude_task_id.as_deref() {
        Some(task_id) => commitments
            .iter()
            .filter(|c| c.task_id() != Some(task_id))
            .cloned()
            .collect(),
        None => commitments.to_vec(),
    };

    // Classification never changes which time is free.
    let ctx = ClassificationContext::default();
    // A duration chrono cannot represent is longer than any free run.
    let wanted = Duration::try_minutes(request.duration_minutes)
        .filter(|_| request.duration_minutes > 0);

    let mut suggestions = Vec::new();
    let mut daily = Vec::new();

    for date in dates_from(request.start_date, request.horizon_days) {
        let segments = segment::segment_day(date, &corpus, &ctx);
        let Some(window) = request.window.on(date) else {
            continue;
        };
        daily.push(aggregate::summarize_day_within(date, &segments, &window));

        let Some(wanted) = wanted else {
            continue;
        };

        let runs = segments
            .iter()
            .filter(|s| s.classification == SegmentClass::Free)
            .filter_map(|s| interval::intersect(&s.interval, &window));

        for run in runs {
            if run.duration() < wanted {
                continue;
            }
            let Some(slot) = place(&run, request.duration_minutes, request.placement) else {
                continue;
            };
            if !conflict::find_conflicts(&slot, &corpus).is_empty() {
                tracing::warn!(start = %slot.start(), end = %slot.end(), "dropping slot that overlaps a commitment");
                continue;
            }
            suggestions.push(FreeSlot::from_interval(slot));
        }
    }

    suggestions.sort_by_key(|s| s.interval.start());
    if let Some(max) = request.max_suggestions {
        suggestions.truncate(max);
    }

    tracing::debug!(
        days = daily.len(),
        suggestions = suggestions.len(),
        duration_minutes = request.duration_minutes,
        "searched free slots"
    );

    SearchResult { suggestions, daily }
}

/// Cut a slot of exactly `minutes` out of `run`.
fn place(run: &Interval, minutes: i64, placement: SlotPlacement) -> Option<Interval> {
    let offset = match placement {
        SlotPlacement::EarliestStart => 0,
        SlotPlacement::Centered => (run.duration_minutes() - minutes).max(0) / 2,
    };
    Interval::starting_at(run.start() + Duration::minutes(offset), minutes).ok()
}
