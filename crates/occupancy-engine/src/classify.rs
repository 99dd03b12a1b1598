//! Segment classification and its priority order.
//!
//! The order `Overlap > CurrentTask > SameCategory > OwnEvent > ExternalEvent > Free`
//! is declared once, on [`SegmentClass`], and every caller goes through
//! [`resolve`] instead of re-deriving it.

use serde::{Deserialize, Serialize};

use crate::commitment::{Commitment, CommitmentSource};

/// Mutually exclusive classification of a stretch of time.
///
/// Variants are declared from lowest to highest priority, so the derived `Ord`
/// is the priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentClass {
    /// Not covered by any commitment.
    Free,
    /// A single event from an external calendar.
    ExternalEvent,
    /// A single event or task owned by this app with no closer relation to the context.
    OwnEvent,
    /// A single task in the context's current category.
    SameCategory,
    /// The context's current task.
    CurrentTask,
    /// Two or more commitments at once.
    Overlap,
}

impl SegmentClass {
    pub fn is_occupied(self) -> bool {
        self != SegmentClass::Free
    }
}

/// What the caller is focused on, used for `CurrentTask` / `SameCategory`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationContext {
    #[serde(default)]
    pub current_task_id: Option<String>,
    #[serde(default)]
    pub current_category_id: Option<String>,
}

impl ClassificationContext {
    pub fn new(current_task_id: Option<String>, current_category_id: Option<String>) -> Self {
        Self {
            current_task_id,
            current_category_id,
        }
    }
}

/// Classify one commitment on its own.
pub fn classify_commitment(commitment: &Commitment, ctx: &ClassificationContext) -> SegmentClass {
    match &commitment.source {
        CommitmentSource::Task(task) => {
            if ctx.current_task_id.as_deref() == Some(task.task_id.as_str()) {
                SegmentClass::CurrentTask
            } else if task.category_id.is_some() && task.category_id == ctx.current_category_id {
                SegmentClass::SameCategory
            } else {
                SegmentClass::OwnEvent
            }
        }
        CommitmentSource::Event(event) if event.is_external => SegmentClass::ExternalEvent,
        CommitmentSource::Event(_) => SegmentClass::OwnEvent,
    }
}

/// Classify a stretch of time from the set of commitments covering it.
///
/// Empty means `Free`; two or more means `Overlap` regardless of what the
/// individual commitments would classify as.
pub fn resolve(covering: &[&Commitment], ctx: &ClassificationContext) -> SegmentClass {
    match covering {
        [] => SegmentClass::Free,
        [single] => classify_commitment(single, ctx),
        _ => SegmentClass::Overlap,
    }
}
