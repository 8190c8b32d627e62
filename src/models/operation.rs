//! Operation model.
//!
//! An operation is a scheduled work item drawn as a bar in its resource's
//! lane. The engine only reads operations and proposes changes; the
//! external collaborator owns them.
//!
//! # Invariants
//! - `end_time > start_time`
//! - `duration_minutes` matches `end_time - start_time` whenever the
//!   engine writes an operation (optimistic patches recompute it).

use chrono::{DateTime, Duration, Utc};
use tracing::warn;
use serde::{Deserialize, Serialize};

use super::TimeSpan;

/// Operation identifier assigned by the collaborator.
pub type OperationId = i64;

/// A scheduled operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier.
    pub id: OperationId,
    /// Human-readable name.
    pub name: String,
    /// External id of the assigned resource. `None` = unassigned.
    pub resource_id: Option<String>,
    /// Denormalized resource name.
    #[serde(default)]
    pub resource_name: String,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end (exclusive).
    pub end_time: DateTime<Utc>,
    /// Duration in whole minutes.
    pub duration_minutes: i64,
    /// Completion percentage, 0..=100.
    #[serde(default)]
    pub percent_done: f64,
}

/// Loose read shape as delivered by the read collaborator.
///
/// Older records may lack an end time or carry out-of-range progress;
/// [`OperationRecord::into_operation`] normalizes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub id: OperationId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub percent_done: Option<f64>,
}

impl Operation {
    /// Creates an unassigned operation spanning `[start, end)`.
    pub fn new(
        id: OperationId,
        name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            resource_id: None,
            resource_name: String::new(),
            start_time,
            end_time,
            duration_minutes: (end_time - start_time).num_minutes(),
            percent_done: 0.0,
        }
    }

    /// Assigns the operation to a resource by external id.
    pub fn on_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Sets the denormalized resource name.
    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = name.into();
        self
    }

    /// Sets progress, clamped to 0..=100.
    pub fn with_percent_done(mut self, percent: f64) -> Self {
        self.percent_done = percent.clamp(0.0, 100.0);
        self
    }

    /// The scheduled interval.
    #[inline]
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.end_time)
    }

    /// Scheduled length (`end - start`).
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Whether the operation is assigned to `resource_id`.
    pub fn is_on(&self, resource_id: &str) -> bool {
        self.resource_id.as_deref() == Some(resource_id)
    }

    /// Whether `duration_minutes` agrees with the interval.
    pub fn duration_is_consistent(&self) -> bool {
        self.duration_minutes == self.duration().num_minutes()
    }

    /// Moves the operation, keeping `duration_minutes` in step.
    pub(crate) fn reschedule(
        &mut self,
        resource_id: String,
        resource_name: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) {
        self.resource_id = Some(resource_id);
        self.resource_name = resource_name;
        self.start_time = start_time;
        self.end_time = end_time;
        self.duration_minutes = (end_time - start_time).num_minutes();
    }
}

impl OperationRecord {
    /// Normalizes a raw record.
    ///
    /// - No start time: the record is dropped (`None`).
    /// - No end time: `start + duration_minutes`, else `start + default_duration_minutes`.
    ///   A duration that runs past the representable time range falls back to
    ///   the default; if that does not fit either, the record is dropped.
    /// - Progress is clamped to 0..=100.
    pub fn into_operation(self, default_duration_minutes: i64) -> Option<Operation> {
        let start_time = self.start_time?;
        let end_time = match self.end_time {
            Some(end) => end,
            None => {
                let end = self
                    .duration_minutes
                    .filter(|m| *m > 0)
                    .and_then(|m| end_after(start_time, m))
                    .or_else(|| end_after(start_time, default_duration_minutes));
                let Some(end) = end else {
                    warn!(
                        id = self.id,
                        duration_minutes = ?self.duration_minutes,
                        default_duration_minutes,
                        "record duration out of range"
                    );
                    return None;
                };
                end
            }
        };
        Some(Operation {
            id: self.id,
            name: self.name,
            resource_id: self.resource_id.filter(|r| !r.is_empty()),
            resource_name: self.resource_name.unwrap_or_default(),
            start_time,
            end_time,
            duration_minutes: (end_time - start_time).num_minutes(),
            percent_done: self.percent_done.unwrap_or(0.0).clamp(0.0, 100.0),
        })
    }
}

fn end_after(start: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    start.checked_add_signed(Duration::try_minutes(minutes)?)
}
