//! Storage layer for the shift time tracker.
//!
//! Persists time entries, the timer snapshot, and the pending-delete
//! marker using `rusqlite`, so CLI state survives between invocations.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send`
//! but not `Sync`. A `Database` can be moved between threads but not
//! shared without external synchronization. The CLI owns exactly one per
//! invocation, matching the single-owner model of the domain state.
//!
//! # Schema
//!
//! Dates and times are stored as TEXT (`YYYY-MM-DD`, `HH:MM:SS`);
//! `created_at` is ISO 8601 UTC so lexicographic order matches
//! chronological order. The timer snapshot is one JSON payload column,
//! deserialized back into the domain [`Timer`].

use std::path::Path;

use chrono::{NaiveDate, NaiveTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use shift_core::{EntryId, EntryStatus, EntryStore, ProjectId, TaskId, TimeEntry, Timer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored row no longer decodes into a domain value.
    #[error("invalid row in {table} (id {id}): {message}")]
    InvalidRow {
        table: &'static str,
        id: i64,
        message: String,
    },
    /// The timer snapshot no longer decodes.
    #[error("invalid timer snapshot: {0}")]
    InvalidTimerSnapshot(#[source] serde_json::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Raw `time_entries` row, decoded into a [`TimeEntry`] after the query.
struct EntryRow {
    id: i64,
    project_id: String,
    task_id: String,
    date: String,
    start_time: String,
    end_time: String,
    duration_secs: i64,
    notes: Option<String>,
    status: String,
    rejection_reason: Option<String>,
}

impl EntryRow {
    fn decode(self) -> Result<TimeEntry, DbError> {
        let invalid = |message: String| DbError::InvalidRow {
            table: "time_entries",
            id: self.id,
            message,
        };
        #[expect(
            clippy::cast_sign_loss,
            reason = "ids are inserted from u64 and never negative"
        )]
        let id = EntryId::new(self.id as u64);
        Ok(TimeEntry {
            id,
            project_id: ProjectId::new(&self.project_id).map_err(|e| invalid(e.to_string()))?,
            task_id: TaskId::new(&self.task_id).map_err(|e| invalid(e.to_string()))?,
            date: NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
                .map_err(|e| invalid(e.to_string()))?,
            start_time: NaiveTime::parse_from_str(&self.start_time, TIME_FORMAT)
                .map_err(|e| invalid(e.to_string()))?,
            end_time: NaiveTime::parse_from_str(&self.end_time, TIME_FORMAT)
                .map_err(|e| invalid(e.to_string()))?,
            duration_secs: self.duration_secs,
            notes: self.notes,
            status: self
                .status
                .parse::<EntryStatus>()
                .map_err(|e| invalid(e.to_string()))?,
            rejection_reason: self.rejection_reason,
        })
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Idempotent, safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS time_entries (
                id INTEGER PRIMARY KEY,
                project_id TEXT NOT NULL,
                task_id TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                notes TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                rejection_reason TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_time_entries_date ON time_entries(date);
            CREATE INDEX IF NOT EXISTS idx_time_entries_status ON time_entries(status);
            CREATE INDEX IF NOT EXISTS idx_time_entries_project ON time_entries(project_id);

            -- Single-row tables for session state
            CREATE TABLE IF NOT EXISTS timer_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                snapshot TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS app_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                pending_delete INTEGER
            );
            ",
        )?;
        Ok(())
    }

    /// Inserts one entry under its already-assigned ID.
    pub fn insert_entry(&mut self, entry: &TimeEntry) -> Result<(), DbError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO time_entries
            (id, project_id, task_id, date, start_time, end_time, duration_secs,
             notes, status, rejection_reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                entry.id.value(),
                entry.project_id.as_str(),
                entry.task_id.as_str(),
                entry.date.format(DATE_FORMAT).to_string(),
                entry.start_time.format(TIME_FORMAT).to_string(),
                entry.end_time.format(TIME_FORMAT).to_string(),
                entry.duration_secs,
                entry.notes,
                entry.status.as_str(),
                entry.rejection_reason,
                created_at,
            ],
        )?;
        Ok(())
    }

    /// Removes an entry. Returns whether a row was deleted.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM time_entries WHERE id = ?", params![id.value()])?;
        Ok(deleted > 0)
    }

    /// Writes an entry's status and rejection reason.
    ///
    /// The transition itself is validated by the domain store before this
    /// is called.
    pub fn update_entry_status(
        &mut self,
        id: EntryId,
        status: EntryStatus,
        rejection_reason: Option<&str>,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "UPDATE time_entries SET status = ?, rejection_reason = ? WHERE id = ?",
            params![status.as_str(), rejection_reason, id.value()],
        )?;
        Ok(())
    }

    /// Lists all entries, newest first (descending ID).
    pub fn list_entries(&self) -> Result<Vec<TimeEntry>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, project_id, task_id, date, start_time, end_time,
                   duration_secs, notes, status, rejection_reason
            FROM time_entries
            ORDER BY id DESC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EntryRow {
                id: row.get(0)?,
                project_id: row.get(1)?,
                task_id: row.get(2)?,
                date: row.get(3)?,
                start_time: row.get(4)?,
                end_time: row.get(5)?,
                duration_secs: row.get(6)?,
                notes: row.get(7)?,
                status: row.get(8)?,
                rejection_reason: row.get(9)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.decode()?);
        }
        Ok(entries)
    }

    /// Reads the pending-delete marker.
    pub fn pending_delete(&self) -> Result<Option<EntryId>, DbError> {
        let id: Option<Option<i64>> = self
            .conn
            .query_row("SELECT pending_delete FROM app_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        #[expect(
            clippy::cast_sign_loss,
            reason = "ids are inserted from u64 and never negative"
        )]
        let id = id.flatten().map(|id| EntryId::new(id as u64));
        Ok(id)
    }

    /// Writes (or clears) the pending-delete marker.
    pub fn set_pending_delete(&mut self, id: Option<EntryId>) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO app_state (id, pending_delete) VALUES (1, ?)
            ON CONFLICT(id) DO UPDATE SET pending_delete = excluded.pending_delete
            ",
            params![id.map(EntryId::value)],
        )?;
        Ok(())
    }

    /// Rebuilds the in-memory entry store from persisted state.
    pub fn load_store(&self) -> Result<EntryStore, DbError> {
        let entries = self.list_entries()?;
        let pending_delete = self.pending_delete()?;
        tracing::debug!(entries = entries.len(), "loaded entry store");
        Ok(EntryStore::from_parts(entries, pending_delete))
    }

    /// Persists the timer snapshot.
    pub fn save_timer(&mut self, timer: &Timer) -> Result<(), DbError> {
        let snapshot =
            serde_json::to_string(timer).map_err(DbError::InvalidTimerSnapshot)?;
        self.conn.execute(
            "
            INSERT INTO timer_state (id, snapshot) VALUES (1, ?)
            ON CONFLICT(id) DO UPDATE SET snapshot = excluded.snapshot
            ",
            params![snapshot],
        )?;
        Ok(())
    }

    /// Loads the timer snapshot, or an idle timer when none was saved.
    pub fn load_timer(&self) -> Result<Timer, DbError> {
        let snapshot: Option<String> = self
            .conn
            .query_row("SELECT snapshot FROM timer_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        match snapshot {
            Some(json) => serde_json::from_str(&json).map_err(DbError::InvalidTimerSnapshot),
            None => Ok(Timer::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use shift_core::{EntryDraft, TaskRef};

    use super::*;

    fn entry(id: u64, date: (i32, u32, u32)) -> TimeEntry {
        EntryDraft {
            project_id: ProjectId::new("proj-a").unwrap(),
            task_id: TaskId::new("task-1").unwrap(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            notes: Some("review".to_string()),
        }
        .into_entry(EntryId::new(id))
        .unwrap()
    }

    #[test]
    fn insert_and_list_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        let first = entry(1, (2025, 3, 10));
        let second = entry(2, (2025, 3, 11));
        db.insert_entry(&first).unwrap();
        db.insert_entry(&second).unwrap();

        let listed = db.list_entries().unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn open_is_idempotent_on_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("shift.db");
        {
            let mut db = Database::open(&path).unwrap();
            db.insert_entry(&entry(1, (2025, 3, 10))).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_entries().unwrap().len(), 1);
    }

    #[test]
    fn status_update_persists() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_entry(&entry(1, (2025, 3, 10))).unwrap();
        db.update_entry_status(EntryId::new(1), EntryStatus::Rejected, Some("wrong day"))
            .unwrap();

        let listed = db.list_entries().unwrap();
        assert_eq!(listed[0].status, EntryStatus::Rejected);
        assert_eq!(listed[0].rejection_reason.as_deref(), Some("wrong day"));
    }

    #[test]
    fn delete_reports_whether_a_row_existed() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_entry(&entry(1, (2025, 3, 10))).unwrap();
        assert!(db.delete_entry(EntryId::new(1)).unwrap());
        assert!(!db.delete_entry(EntryId::new(1)).unwrap());
    }

    #[test]
    fn pending_delete_marker_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        assert_eq!(db.pending_delete().unwrap(), None);

        db.set_pending_delete(Some(EntryId::new(4))).unwrap();
        assert_eq!(db.pending_delete().unwrap(), Some(EntryId::new(4)));

        db.set_pending_delete(None).unwrap();
        assert_eq!(db.pending_delete().unwrap(), None);
    }

    #[test]
    fn load_store_resumes_ids_past_persisted_entries() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_entry(&entry(1, (2025, 3, 10))).unwrap();
        db.insert_entry(&entry(2, (2025, 3, 11))).unwrap();

        let mut store = db.load_store().unwrap();
        let submitted = store
            .submit(EntryDraft {
                project_id: ProjectId::new("proj-b").unwrap(),
                task_id: TaskId::new("task-2").unwrap(),
                date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                notes: None,
            })
            .unwrap();
        assert_eq!(submitted.id, EntryId::new(3));
    }

    #[test]
    fn timer_snapshot_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        // No snapshot yet: idle timer
        assert_eq!(db.load_timer().unwrap(), Timer::new());

        let mut timer = Timer::new();
        timer
            .select_project(
                ProjectId::new("proj-a").unwrap(),
                vec![TaskRef {
                    id: TaskId::new("task-1").unwrap(),
                    name: "Task 1".to_string(),
                }],
            )
            .unwrap();
        timer.select_task(TaskId::new("task-1").unwrap()).unwrap();
        timer.start().unwrap();
        timer.tick();
        timer.pause();

        db.save_timer(&timer).unwrap();
        assert_eq!(db.load_timer().unwrap(), timer);

        // Overwrites, not appends
        db.save_timer(&Timer::new()).unwrap();
        assert_eq!(db.load_timer().unwrap(), Timer::new());
    }
}
