//! Detect commitments overlapping a candidate interval.
//!
//! A commitment conflicts with the candidate when their intersection has
//! positive length. Adjacent intervals (where one ends exactly when the other
//! starts) are NOT conflicts.

use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::interval::{self, Interval};

/// One commitment intersecting the candidate, with the shared sub-interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub commitment: Commitment,
    pub overlap: Interval,
}

impl Conflict {
    pub fn overlap_minutes(&self) -> i64 {
        self.overlap.duration_minutes()
    }
}

/// All conflicts for one candidate, in corpus order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub candidate: Interval,
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Sum of per-conflict overlap minutes. Overlaps between the conflicting
    /// commitments themselves are counted once per commitment.
    pub fn total_overlap_minutes(&self) -> i64 {
        self.conflicts.iter().map(Conflict::overlap_minutes).sum()
    }
}

/// A pair of corpus commitments that overlap each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlappingPair {
    pub first: Commitment,
    pub second: Commitment,
    pub overlap: Interval,
}

/// Find every commitment in `corpus` that intersects `candidate`.
pub fn find_conflicts(candidate: &Interval, corpus: &[Commitment]) -> ConflictReport {
    let conflicts: Vec<Conflict> = corpus
        .iter()
        .filter_map(|commitment| {
            interval::intersect(candidate, &commitment.interval).map(|overlap| Conflict {
                commitment: commitment.clone(),
                overlap,
            })
        })
        .collect();

    tracing::debug!(
        corpus = corpus.len(),
        conflicts = conflicts.len(),
        "checked candidate for conflicts"
    );

    ConflictReport {
        candidate: *candidate,
        conflicts,
    }
}

/// Like [`find_conflicts`], but ignores the commitment(s) belonging to `task_id`.
///
/// Used when `candidate` is the new time of a task being edited, so the task's
/// current slot does not report as conflicting with itself.
pub fn find_conflicts_for_task(
    candidate: &Interval,
    corpus: &[Commitment],
    task_id: &str,
) -> ConflictReport {
    let others: Vec<Commitment> = corpus
        .iter()
        .filter(|c| c.task_id() != Some(task_id))
        .cloned()
        .collect();
    find_conflicts(candidate, &others)
}

/// List every unordered pair of corpus commitments that overlap.
///
/// Pairs are reported in corpus order: `first` precedes `second` in `corpus`.
pub fn find_overlapping_pairs(corpus: &[Commitment]) -> Vec<OverlappingPair> {
    let mut pairs = Vec::new();

    for (i, a) in corpus.iter().enumerate() {
        for b in &corpus[i + 1..] {
            if let Some(overlap) = interval::intersect(&a.interval, &b.interval) {
                pairs.push(OverlappingPair {
                    first: a.clone(),
                    second: b.clone(),
                    overlap,
                });
            }
        }
    }

    pairs
}
