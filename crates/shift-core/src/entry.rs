//! Time entries and manual-entry validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::EntryStatus;
use crate::types::{EntryId, ProjectId, TaskId};

/// Errors creating a time entry from user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The end time was not after the start time.
    #[error("invalid time range: {start} to {end}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },
}

/// A single tracked block of work, carrying its approval status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeEntry {
    /// Unique identifier, assigned by the entry store.
    pub id: EntryId,
    /// The project this entry belongs to (owned by the external directory).
    pub project_id: ProjectId,
    /// The task this entry belongs to, scoped under `project_id`.
    pub task_id: TaskId,
    /// Calendar date of the work.
    pub date: NaiveDate,
    /// Wall-clock start of the block.
    pub start_time: NaiveTime,
    /// Wall-clock end of the block.
    pub end_time: NaiveTime,
    /// Tracked duration in whole seconds, always non-negative.
    pub duration_secs: i64,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Approval status. New entries always start pending.
    #[serde(default)]
    pub status: EntryStatus,
    /// Present only when `status` is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Unsubmitted entry fields, as captured by the manual entry form or
/// prefilled from an existing entry when editing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryDraft {
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EntryDraft {
    /// Computes the draft's duration as a same-day wall-clock subtraction.
    ///
    /// Fails when the end time is not strictly after the start time; in
    /// that case no entry may be created from this draft.
    pub fn duration_secs(&self) -> Result<i64, EntryError> {
        let duration = (self.end_time - self.start_time).num_seconds();
        if duration <= 0 {
            return Err(EntryError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(duration)
    }

    /// Validates the draft and builds a pending entry with the given ID.
    pub fn into_entry(self, id: EntryId) -> Result<TimeEntry, EntryError> {
        let duration_secs = self.duration_secs()?;
        Ok(TimeEntry {
            id,
            project_id: self.project_id,
            task_id: self.task_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_secs,
            notes: self.notes,
            status: EntryStatus::Pending,
            rejection_reason: None,
        })
    }
}

impl TimeEntry {
    /// Extracts the entry's fields back into a draft for resubmission.
    #[must_use]
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            project_id: self.project_id.clone(),
            task_id: self.task_id.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(start: (u32, u32, u32), end: (u32, u32, u32)) -> EntryDraft {
        EntryDraft {
            project_id: ProjectId::new("proj-1").unwrap(),
            task_id: TaskId::new("task-1").unwrap(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, start.2).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, end.2).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn duration_is_exact_second_difference() {
        let d = draft((9, 0, 0), (12, 30, 15));
        assert_eq!(d.duration_secs().unwrap(), 3 * 3600 + 30 * 60 + 15);
    }

    #[test]
    fn zero_length_range_is_rejected() {
        let d = draft((9, 0, 0), (9, 0, 0));
        assert_eq!(
            d.duration_secs(),
            Err(EntryError::InvalidTimeRange {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            })
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let d = draft((14, 0, 0), (9, 0, 0));
        assert!(d.duration_secs().is_err());
        assert!(d.into_entry(EntryId::new(1)).is_err());
    }

    #[test]
    fn into_entry_starts_pending() {
        let entry = draft((9, 0, 0), (10, 0, 0))
            .into_entry(EntryId::new(5))
            .unwrap();
        assert_eq!(entry.id, EntryId::new(5));
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.duration_secs, 3600);
        assert_eq!(entry.rejection_reason, None);
    }

    #[test]
    fn to_draft_roundtrips_fields() {
        let entry = draft((8, 15, 0), (9, 45, 30))
            .into_entry(EntryId::new(1))
            .unwrap();
        let d = entry.to_draft();
        assert_eq!(d, draft((8, 15, 0), (9, 45, 30)));
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = draft((9, 0, 0), (10, 0, 0))
            .into_entry(EntryId::new(3))
            .unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("rejection_reason"));
        let parsed: TimeEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
