//! Timer commands: select, run, status, stop.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Local;

use shift_core::{ProjectDirectory, ProjectId, TaskId, format_hours};
use shift_db::Database;

use super::util;
use crate::{Config, Ticker};

/// Selects the project (and optionally a task), fetching the project's
/// task list from the directory. Switching projects invalidates the task
/// selection.
pub fn select<W: Write>(
    writer: &mut W,
    db: &mut Database,
    config: &Config,
    project: &str,
    task: Option<&str>,
) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;

    let project_id = ProjectId::new(project)?;
    let tasks = runtime
        .block_on(client.list_tasks(&project_id))
        .context("failed to list tasks")?;

    let mut timer = db.load_timer()?;
    timer.select_project(project_id, tasks)?;
    if let Some(task) = task {
        timer.select_task(TaskId::new(task)?)?;
    }
    db.save_timer(&timer)?;

    match timer.task() {
        Some(task) => writeln!(writer, "Tracking {}/{task}.", project)?,
        None => {
            writeln!(writer, "Project {project} selected. Available tasks:")?;
            for task in timer.available_tasks() {
                writeln!(writer, "- {}: {}", task.id, task.name)?;
            }
        }
    }
    Ok(())
}

/// Shows the current selection and elapsed time.
pub fn status<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let timer = db.load_timer()?;
    match (timer.project(), timer.task()) {
        (Some(project), Some(task)) => writeln!(writer, "Tracking {project}/{task}.")?,
        (Some(project), None) => writeln!(writer, "Project {project} selected, no task yet.")?,
        _ => writeln!(writer, "Nothing selected.")?,
    }
    writeln!(
        writer,
        "Elapsed: {}s ({})",
        timer.elapsed_secs(),
        if timer.is_running() { "running" } else { "paused" },
    )?;
    Ok(())
}

/// Runs the timer in the foreground, ticking once per second until Ctrl-C
/// pauses the session. The elapsed count is persisted on exit.
pub fn run<W: Write>(writer: &mut W, db: &mut Database) -> Result<()> {
    let mut timer = db.load_timer()?;
    timer.start()?;
    db.save_timer(&timer)?;
    writeln!(
        writer,
        "Timer running ({}s so far). Press Ctrl-C to pause.",
        timer.elapsed_secs(),
    )?;

    let shared = Arc::new(Mutex::new(timer));
    let runtime = util::runtime()?;
    runtime.block_on(async {
        let ticker = {
            let shared = Arc::clone(&shared);
            Ticker::start(Duration::from_secs(1), move || {
                if let Ok(mut timer) = shared.lock() {
                    timer.tick();
                }
            })
        };
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?;
        // No tick may land after this point
        ticker.cancel().await;
        anyhow::Ok(())
    })?;

    let mut timer = shared
        .lock()
        .map_err(|_| anyhow!("timer state poisoned"))?
        .clone();
    timer.pause();
    db.save_timer(&timer)?;
    writeln!(
        writer,
        "Paused at {}s. Run `shift timer stop` to create an entry.",
        timer.elapsed_secs(),
    )?;
    Ok(())
}

/// Stops the session. Emits one pending entry when time accrued; the
/// counter and transient notes reset either way.
pub fn stop<W: Write>(writer: &mut W, db: &mut Database, notes: Option<String>) -> Result<()> {
    let mut timer = db.load_timer()?;
    if notes.is_some() {
        timer.set_notes(notes);
    }

    let now = Local::now().naive_local();
    let session = timer.stop(now);
    db.save_timer(&timer)?;

    let Some(session) = session else {
        writeln!(writer, "No time tracked; nothing created.")?;
        return Ok(());
    };

    let mut store = db.load_store()?;
    let entry = store.record_session(session).clone();
    db.insert_entry(&entry)?;
    writeln!(
        writer,
        "Created entry {} ({} hours tracked, pending approval).",
        entry.id,
        format_hours(entry.duration_secs),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use shift_core::{EntryStatus, TaskRef, Timer};

    use super::*;

    fn paused_timer(elapsed: i64) -> Timer {
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
        for _ in 0..elapsed {
            timer.tick();
        }
        timer.pause();
        timer
    }

    #[test]
    fn stop_creates_a_pending_entry_from_the_session() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_timer(&paused_timer(90)).unwrap();

        let mut output = Vec::new();
        stop(&mut output, &mut db, Some("standup".to_string())).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Created entry 1 (0.03 hours tracked, pending approval).\n"
        );

        let entries = db.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration_secs, 90);
        assert_eq!(entries[0].status, EntryStatus::Pending);
        assert_eq!(entries[0].notes.as_deref(), Some("standup"));

        // Counter is reset in the persisted snapshot
        assert_eq!(db.load_timer().unwrap().elapsed_secs(), 0);
    }

    #[test]
    fn stop_without_elapsed_creates_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_timer(&paused_timer(0)).unwrap();

        let mut output = Vec::new();
        stop(&mut output, &mut db, None).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "No time tracked; nothing created.\n"
        );
        assert!(db.list_entries().unwrap().is_empty());
    }

    #[test]
    fn run_fails_without_a_selection() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let result = run(&mut output, &mut db);
        assert!(result.is_err());
        // The failed start must not persist a running timer
        assert!(!db.load_timer().unwrap().is_running());
    }

    #[test]
    fn status_reports_selection_and_elapsed() {
        let mut db = Database::open_in_memory().unwrap();
        db.save_timer(&paused_timer(42)).unwrap();

        let mut output = Vec::new();
        status(&mut output, &db).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("proj-a/task-1"));
        assert!(output.contains("42s (paused)"));
    }
}
