//! The in-memory time entry store.
//!
//! An ordered collection of entries, newest first. The store is the sole
//! mutation API over its entries: submission, two-step deletion,
//! edit-as-prefill, and status transitions all go through it.

use chrono::NaiveDate;
use thiserror::Error;

use crate::entry::{EntryDraft, EntryError, TimeEntry};
use crate::status::{EntryStatus, TransitionError};
use crate::timer::StoppedSession;
use crate::types::{EntryId, ProjectId};

/// Errors from store mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entry with the given ID exists.
    #[error("no time entry with id {id}")]
    NotFound { id: EntryId },
    /// The requested status change is not a legal lifecycle transition.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Filter predicates for [`EntryStore::filter`]. Unset fields match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub date: Option<NaiveDate>,
    pub project: Option<ProjectId>,
    pub status: Option<EntryStatus>,
}

impl EntryQuery {
    fn matches(&self, entry: &TimeEntry) -> bool {
        self.date.is_none_or(|date| entry.date == date)
            && self
                .project
                .as_ref()
                .is_none_or(|project| &entry.project_id == project)
            && self.status.is_none_or(|status| entry.status == status)
    }
}

/// Ordered collection of time entries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStore {
    entries: Vec<TimeEntry>,
    next_id: u64,
    pending_delete: Option<EntryId>,
}

impl EntryStore {
    /// Creates an empty store. The first entry gets ID 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            pending_delete: None,
        }
    }

    /// Rebuilds a store from persisted state.
    ///
    /// Entries must already be ordered newest first. The ID counter resumes
    /// past the largest existing ID so IDs are never reused.
    #[must_use]
    pub fn from_parts(entries: Vec<TimeEntry>, pending_delete: Option<EntryId>) -> Self {
        let next_id = entries
            .iter()
            .map(|entry| entry.id.value())
            .max()
            .map_or(1, |max| max + 1);
        Self {
            entries,
            next_id,
            pending_delete,
        }
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    /// Looks up an entry by ID.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&TimeEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// The ID currently marked for deletion, if any.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<EntryId> {
        self.pending_delete
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Validates a manual draft and prepends the resulting pending entry.
    ///
    /// On a validation failure nothing is created and the store (and the
    /// caller's draft) are untouched.
    pub fn submit(&mut self, draft: EntryDraft) -> Result<&TimeEntry, EntryError> {
        // Validate before allocating an ID so a failed submit leaves no gap.
        draft.duration_secs()?;
        let id = self.allocate_id();
        let entry = draft.into_entry(id)?;
        self.entries.insert(0, entry);
        Ok(&self.entries[0])
    }

    /// Prepends a pending entry emitted by the timer.
    ///
    /// Timer sessions carry their exact tick count as the duration and are
    /// not re-validated against the derived start/end times.
    pub fn record_session(&mut self, session: StoppedSession) -> &TimeEntry {
        let id = self.allocate_id();
        let entry = TimeEntry {
            id,
            project_id: session.project_id,
            task_id: session.task_id,
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
            duration_secs: session.duration_secs,
            notes: session.notes,
            status: EntryStatus::Pending,
            rejection_reason: None,
        };
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    /// Returns the entries matching every set predicate, newest first.
    ///
    /// Pure: the store is not mutated.
    #[must_use]
    pub fn filter(&self, query: &EntryQuery) -> Vec<&TimeEntry> {
        self.entries
            .iter()
            .filter(|entry| query.matches(entry))
            .collect()
    }

    /// Sums `duration_secs` over entries matching the optional status.
    #[must_use]
    pub fn total_seconds(&self, status: Option<EntryStatus>) -> i64 {
        self.entries
            .iter()
            .filter(|entry| status.is_none_or(|s| entry.status == s))
            .map(|entry| entry.duration_secs)
            .sum()
    }

    /// Total tracked time in hours, formatted to two decimal places.
    #[must_use]
    pub fn total_hours(&self, status: Option<EntryStatus>) -> String {
        format_hours(self.total_seconds(status))
    }

    /// Marks an entry for deletion without removing it.
    ///
    /// Returns `false` (leaving any existing mark untouched) when the ID
    /// does not exist. Requesting again re-marks; nothing is removed until
    /// [`EntryStore::confirm_delete`].
    pub fn request_delete(&mut self, id: EntryId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    /// Clears the deletion mark without removing anything.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Removes the marked entry, if the mark and the entry both exist.
    ///
    /// The mark is consumed either way.
    pub fn confirm_delete(&mut self) -> Option<TimeEntry> {
        let id = self.pending_delete.take()?;
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Starts an edit: removes the entry and returns a prefilled draft.
    ///
    /// Edit is delete-then-prefill, not in-place mutation; resubmitting the
    /// draft creates a fresh pending entry under a new ID. An abandoned
    /// edit therefore loses the original entry.
    pub fn begin_edit(&mut self, id: EntryId) -> Option<EntryDraft> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let entry = self.entries.remove(index);
        Some(entry.to_draft())
    }

    /// Applies a status transition to an entry.
    ///
    /// The rejection reason is stored only when the target status is
    /// rejected.
    pub fn set_status(
        &mut self,
        id: EntryId,
        target: EntryStatus,
        rejection_reason: Option<String>,
    ) -> Result<&TimeEntry, StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(StoreError::NotFound { id })?;
        entry.status = entry.status.transition_to(target)?;
        entry.rejection_reason = if target == EntryStatus::Rejected {
            rejection_reason
        } else {
            None
        };
        Ok(entry)
    }
}

/// Formats a second count as hours with two decimal places.
#[must_use]
pub fn format_hours(seconds: i64) -> String {
    #[expect(
        clippy::cast_precision_loss,
        reason = "durations are far below f64's exact integer range"
    )]
    let hours = seconds as f64 / 3600.0;
    format!("{hours:.2}")
}
