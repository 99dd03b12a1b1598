//! # occupancy-engine
//!
//! Calendar occupancy and free-slot scheduling for a personal task planner.
//!
//! Given already-loaded tasks and calendar event instances, the engine segments
//! any day into classified, non-overlapping intervals, explains overlaps
//! between a candidate interval and existing commitments, and searches a
//! multi-day horizon for free intervals of a requested duration. Every call is
//! a pure computation over its inputs; nothing is cached between calls.
//!
//! ## Modules
//!
//! - [`interval`]: Half-open intervals and overlap primitives
//! - [`commitment`]: Task/event records normalized into commitments
//! - [`classify`]: Segment classes and their priority order
//! - [`segment`]: Split a day into classified, gap-free segments
//! - [`conflict`]: Commitments overlapping a candidate interval
//! - [`freeslot`]: Free-slot search over a horizon of days
//! - [`aggregate`]: Per-day free/busy totals
//! - [`config`]: TOML configuration
//! - [`error`]: Error types

pub mod aggregate;
pub mod classify;
pub mod commitment;
pub mod config;
pub mod conflict;
pub mod error;
pub mod freeslot;
pub mod interval;
pub mod segment;

pub use aggregate::{summarize_day, DailyFreeTime};
pub use classify::{ClassificationContext, SegmentClass};
pub use commitment::{build_commitments, Commitment, EventRecord, TaskRecord};
pub use config::EngineConfig;
pub use conflict::{find_conflicts, find_conflicts_for_task, ConflictReport};
pub use error::EngineError;
pub use freeslot::{search_free_slots, ActivityWindow, FreeSlot, SearchRequest, SearchResult};
pub use interval::Interval;
pub use segment::{segment_day, segment_days, Segment};
