//! Time entry commands: add, list, delete, edit, approve, reject.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveTime};

use shift_core::{
    EntryDraft, EntryId, EntryQuery, EntryStatus, NotificationSink, ProjectId, TaskId, TimeEntry,
    format_hours,
};
use shift_db::Database;

use super::util;
use crate::Config;

/// Adds a manual entry. Validation failures create nothing.
pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    project: &str,
    task: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    notes: Option<String>,
) -> Result<()> {
    let draft = EntryDraft {
        project_id: ProjectId::new(project)?,
        task_id: TaskId::new(task)?,
        date,
        start_time: start,
        end_time: end,
        notes,
    };

    let mut store = db.load_store()?;
    let entry = store.submit(draft)?.clone();
    db.insert_entry(&entry)?;

    writeln!(
        writer,
        "Created entry {} ({} hours on {}, pending approval).",
        entry.id,
        format_hours(entry.duration_secs),
        entry.date,
    )?;
    Ok(())
}

/// Lists entries matching the given filters, newest first.
pub fn list<W: Write>(
    writer: &mut W,
    db: &Database,
    date: Option<NaiveDate>,
    project: Option<&str>,
    status: Option<EntryStatus>,
    json: bool,
) -> Result<()> {
    let store = db.load_store()?;
    let query = EntryQuery {
        date,
        project: project.map(ProjectId::new).transpose()?,
        status,
    };
    let entries = store.filter(&query);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No entries.")?;
        return Ok(());
    }
    for entry in entries {
        write_entry_line(writer, entry)?;
    }
    Ok(())
}

fn write_entry_line<W: Write>(writer: &mut W, entry: &TimeEntry) -> Result<()> {
    write!(
        writer,
        "#{} {} {}-{} {}/{} {}h {}",
        entry.id,
        entry.date,
        entry.start_time,
        entry.end_time,
        entry.project_id,
        entry.task_id,
        format_hours(entry.duration_secs),
        entry.status,
    )?;
    if let Some(reason) = &entry.rejection_reason {
        write!(writer, " ({reason})")?;
    }
    if let Some(notes) = &entry.notes {
        write!(writer, " [{notes}]")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Two-step deletion: the first call marks the entry, a rerun with `--yes`
/// removes it. Nothing is removed until the confirmation.
pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: u64, yes: bool) -> Result<()> {
    let mut store = db.load_store()?;
    let id = EntryId::new(id);

    if !yes {
        if !store.request_delete(id) {
            bail!("no time entry with id {id}");
        }
        db.set_pending_delete(Some(id))?;
        writeln!(
            writer,
            "Entry {id} marked for deletion. Rerun with --yes to confirm."
        )?;
        return Ok(());
    }

    if store.pending_delete() != Some(id) {
        bail!("deletion of entry {id} was not requested; run `shift entry delete {id}` first");
    }
    match store.confirm_delete() {
        Some(entry) => {
            db.delete_entry(entry.id)?;
            db.set_pending_delete(None)?;
            writeln!(writer, "Deleted entry {}.", entry.id)?;
        }
        None => {
            db.set_pending_delete(None)?;
            writeln!(writer, "Entry {id} no longer exists.")?;
        }
    }
    Ok(())
}

/// Starts an edit: removes the entry and prints a prefilled `entry add`
/// invocation for resubmission.
pub fn edit<W: Write>(writer: &mut W, db: &mut Database, id: u64) -> Result<()> {
    let mut store = db.load_store()?;
    let id = EntryId::new(id);
    let Some(draft) = store.begin_edit(id) else {
        bail!("no time entry with id {id}");
    };
    db.delete_entry(id)?;

    writeln!(writer, "Entry {id} removed. Resubmit with:")?;
    write!(
        writer,
        "  shift entry add --project {} --task {} --date {} --start {} --end {}",
        draft.project_id, draft.task_id, draft.date, draft.start_time, draft.end_time,
    )?;
    if let Some(notes) = &draft.notes {
        write!(writer, " --notes {notes:?}")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Applies an approval-lifecycle transition and persists it.
///
/// A configured notification sink is informed best-effort; delivery
/// failures are logged, never surfaced, and the local state stands.
pub fn set_status<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    id: u64,
    target: EntryStatus,
    reason: Option<String>,
) -> Result<()> {
    let mut store = db.load_store()?;
    let id = EntryId::new(id);
    let entry = store.set_status(id, target, reason)?.clone();
    db.update_entry_status(id, target, entry.rejection_reason.as_deref())?;

    writeln!(writer, "Entry {id} {target}.")?;
    notify_transition(config, &entry);
    Ok(())
}

fn notify_transition(config: &Config, entry: &TimeEntry) {
    if config.api_url.is_none() {
        tracing::debug!("no backend configured, skipping notification");
        return;
    }
    let result = (|| -> Result<()> {
        let client = util::api_client(config)?;
        let runtime = util::runtime()?;
        let message = format!(
            "Entry for {} on {} is now {}.",
            entry.task_id, entry.date, entry.status
        );
        runtime.block_on(async {
            match entry.status {
                EntryStatus::Rejected => {
                    client.notify_error("Time entry rejected", &message).await
                }
                _ => client.notify_success("Time entry updated", &message).await,
            }
        })?;
        Ok(())
    })();
    if let Err(err) = result {
        tracing::warn!(%err, "notification delivery failed");
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn test_config() -> Config {
        Config {
            database_path: "unused".into(),
            api_url: None,
            api_token: None,
        }
    }

    fn add_entry(db: &mut Database, date: &str, start: (u32, u32), end: (u32, u32)) {
        let mut sink = Vec::new();
        add(
            &mut sink,
            db,
            "proj-a",
            "task-1",
            date.parse().unwrap(),
            NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            None,
        )
        .unwrap();
    }

    #[test]
    fn add_then_list_newest_first() {
        let mut db = Database::open_in_memory().unwrap();
        add_entry(&mut db, "2025-03-10", (9, 0), (12, 30));
        add_entry(&mut db, "2025-03-11", (13, 0), (14, 0));

        let mut output = Vec::new();
        list(&mut output, &db, None, None, None, false).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        #2 2025-03-11 13:00:00-14:00:00 proj-a/task-1 1.00h pending
        #1 2025-03-10 09:00:00-12:30:00 proj-a/task-1 3.50h pending
        ");
    }

    #[test]
    fn add_rejects_inverted_range_and_creates_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        let mut sink = Vec::new();
        let result = add(
            &mut sink,
            &mut db,
            "proj-a",
            "task-1",
            "2025-03-10".parse().unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            None,
        );
        assert!(result.is_err());
        assert!(db.list_entries().unwrap().is_empty());
    }

    #[test]
    fn list_filters_by_status() {
        let mut db = Database::open_in_memory().unwrap();
        add_entry(&mut db, "2025-03-10", (9, 0), (10, 0));
        add_entry(&mut db, "2025-03-11", (9, 0), (10, 0));
        let mut sink = Vec::new();
        set_status(
            &mut sink,
            &mut db,
            &test_config(),
            1,
            EntryStatus::Approved,
            None,
        )
        .unwrap();

        let mut output = Vec::new();
        list(
            &mut output,
            &db,
            None,
            None,
            Some(EntryStatus::Approved),
            false,
        )
        .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("#1"));
        assert!(!output.contains("#2"));
    }

    #[test]
    fn delete_is_two_step() {
        let mut db = Database::open_in_memory().unwrap();
        add_entry(&mut db, "2025-03-10", (9, 0), (10, 0));

        // Confirming without a request fails
        let mut sink = Vec::new();
        assert!(delete(&mut sink, &mut db, 1, true).is_err());
        assert_eq!(db.list_entries().unwrap().len(), 1);

        // Request twice: still nothing removed
        delete(&mut sink, &mut db, 1, false).unwrap();
        delete(&mut sink, &mut db, 1, false).unwrap();
        assert_eq!(db.list_entries().unwrap().len(), 1);

        // Confirm removes exactly the marked entry
        delete(&mut sink, &mut db, 1, true).unwrap();
        assert!(db.list_entries().unwrap().is_empty());
    }

    #[test]
    fn edit_removes_and_prints_prefill() {
        let mut db = Database::open_in_memory().unwrap();
        add_entry(&mut db, "2025-03-10", (9, 0), (12, 30));

        let mut output = Vec::new();
        edit(&mut output, &mut db, 1).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Entry 1 removed. Resubmit with:
          shift entry add --project proj-a --task task-1 --date 2025-03-10 --start 09:00:00 --end 12:30:00
        ");
        assert!(db.list_entries().unwrap().is_empty());
    }

    #[test]
    fn reject_stores_the_reason() {
        let mut db = Database::open_in_memory().unwrap();
        add_entry(&mut db, "2025-03-10", (9, 0), (10, 0));

        let mut sink = Vec::new();
        set_status(
            &mut sink,
            &mut db,
            &test_config(),
            1,
            EntryStatus::Rejected,
            Some("wrong project".to_string()),
        )
        .unwrap();

        let entries = db.list_entries().unwrap();
        assert_eq!(entries[0].status, EntryStatus::Rejected);
        assert_eq!(entries[0].rejection_reason.as_deref(), Some("wrong project"));

        // Terminal: approving a rejected entry fails
        let result = set_status(
            &mut sink,
            &mut db,
            &test_config(),
            1,
            EntryStatus::Approved,
            None,
        );
        assert!(result.is_err());
    }
}
