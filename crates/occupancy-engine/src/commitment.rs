//! Normalization of task and calendar-event records into [`Commitment`]s.
//!
//! Records arrive from the task and calendar repositories as plain data and are
//! never mutated. Each one that has a concrete time span becomes a read-only
//! `Commitment` snapshot for the duration of a single engine call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::interval::Interval;

/// A task as supplied by the task repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    /// When the task is scheduled to start. Tasks without one occupy no time.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Estimated length. `None` falls back to the configured default.
    #[serde(default)]
    pub estimated_minutes: Option<i64>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// A calendar event instance as supplied by the calendar repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub calendar_name: String,
    /// Sourced from an external calendar rather than created by this app.
    #[serde(default)]
    pub is_external: bool,
}

/// Reference back to the task a commitment was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub task_id: String,
    pub category_id: Option<String>,
}

/// Reference back to the calendar event a commitment was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub event_id: String,
    pub is_external: bool,
    pub title: String,
    pub calendar_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommitmentSource {
    Task(TaskRef),
    Event(EventRef),
}

/// A task or event normalized to an interval plus classification metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub interval: Interval,
    pub source: CommitmentSource,
}

impl Commitment {
    /// Normalize a task record.
    ///
    /// Returns `Ok(None)` when the task has no due timestamp.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` when the estimate is zero or negative.
    pub fn from_task(task: &TaskRecord, default_minutes: i64) -> Result<Option<Self>> {
        let Some(due) = task.due_date else {
            return Ok(None);
        };
        let minutes = task.estimated_minutes.unwrap_or(default_minutes);
        let interval = Interval::starting_at(due, minutes)?;
        Ok(Some(Self {
            interval,
            source: CommitmentSource::Task(TaskRef {
                task_id: task.id.clone(),
                category_id: task.category_id.clone(),
            }),
        }))
    }

    /// Normalize a calendar event record.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInterval` when `ends_at <= starts_at`.
    pub fn from_event(event: &EventRecord) -> Result<Self> {
        let interval = Interval::new(event.starts_at, event.ends_at)?;
        Ok(Self {
            interval,
            source: CommitmentSource::Event(EventRef {
                event_id: event.id.clone(),
                is_external: event.is_external,
                title: event.title.clone(),
                calendar_name: event.calendar_name.clone(),
            }),
        })
    }

    /// The originating task id, if this commitment came from a task.
    pub fn task_id(&self) -> Option<&str> {
        match &self.source {
            CommitmentSource::Task(task) => Some(task.task_id.as_str()),
            CommitmentSource::Event(_) => None,
        }
    }
}

/// Normalize both record lists into one commitment corpus.
///
/// Completed tasks are dropped unless `config.include_completed_tasks` is set.
/// Records that normalize to an invalid interval are skipped with a warning;
/// one bad record never aborts the batch.
pub fn build_commitments(
    tasks: &[TaskRecord],
    events: &[EventRecord],
    config: &EngineConfig,
) -> Vec<Commitment> {
    let mut commitments = Vec::with_capacity(tasks.len() + events.len());

    for task in tasks {
        if task.is_completed && !config.include_completed_tasks {
            continue;
        }
        match Commitment::from_task(task, config.default_task_minutes) {
            Ok(Some(commitment)) => commitments.push(commitment),
            Ok(None) => {}
            Err(e) => tracing::warn!(task_id = %task.id, error = %e, "skipping task"),
        }
    }

    for event in events {
        match Commitment::from_event(event) {
            Ok(commitment) => commitments.push(commitment),
            Err(e) => tracing::warn!(event_id = %event.id, error = %e, "skipping event"),
        }
    }

    tracing::debug!(
        tasks = tasks.len(),
        events = events.len(),
        commitments = commitments.len(),
        "normalized commitments"
    );

    commitments
}
