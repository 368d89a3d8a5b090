//! The timer controller: a single logical tracking session.
//!
//! The timer owns elapsed-time accumulation while a session is running.
//! Ticks are driven externally, once per second, by whatever schedules the
//! controller (the CLI runs a cancellable repeating task). All state here
//! is owned by one caller and mutated only through these methods; there is
//! never more than one timer.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::remote::TaskRef;
use crate::types::{ProjectId, TaskId};

/// Errors from timer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Starting requires both a project and a task to be selected.
    #[error("cannot start timer: select a project and a task first")]
    MissingSelection,
    /// The project cannot change while the timer is running.
    #[error("cannot change project while the timer is running")]
    ProjectLocked,
    /// The task is not in the selected project's task list.
    #[error("task {task} does not belong to the selected project")]
    UnknownTask { task: TaskId },
}

/// A completed tracking session, emitted by [`Timer::stop`].
///
/// Unlike a manual entry, the duration here is the exact tick count; the
/// start time is derived by subtracting it from the stop instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedSession {
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_secs: i64,
    pub notes: Option<String>,
}

/// The timer controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    project: Option<ProjectId>,
    task: Option<TaskId>,
    /// Tasks available under the selected project. Scoped per project:
    /// switching projects replaces this list wholesale.
    available_tasks: Vec<TaskRef>,
    running: bool,
    elapsed_secs: i64,
    notes: Option<String>,
}

impl Timer {
    /// Creates an idle timer with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected project, if any.
    #[must_use]
    pub const fn project(&self) -> Option<&ProjectId> {
        self.project.as_ref()
    }

    /// The currently selected task, if any.
    #[must_use]
    pub const fn task(&self) -> Option<&TaskId> {
        self.task.as_ref()
    }

    /// Tasks available under the selected project.
    #[must_use]
    pub fn available_tasks(&self) -> &[TaskRef] {
        &self.available_tasks
    }

    /// Whether the timer is currently accumulating ticks.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds accumulated so far in this session.
    #[must_use]
    pub const fn elapsed_secs(&self) -> i64 {
        self.elapsed_secs
    }

    /// Transient notes for the entry the session will emit.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Sets the transient notes input.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Selects a project and installs its task list.
    ///
    /// Tasks are scoped per project, so the previous task selection is
    /// invalidated. Only allowed while the timer is not running.
    pub fn select_project(
        &mut self,
        project: ProjectId,
        tasks: Vec<TaskRef>,
    ) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::ProjectLocked);
        }
        self.project = Some(project);
        self.task = None;
        self.available_tasks = tasks;
        Ok(())
    }

    /// Selects a task from the current project's task list.
    pub fn select_task(&mut self, task: TaskId) -> Result<(), TimerError> {
        if !self.available_tasks.iter().any(|t| t.id == task) {
            return Err(TimerError::UnknownTask { task });
        }
        self.task = Some(task);
        Ok(())
    }

    /// Begins (or resumes) accumulating ticks.
    ///
    /// Fails unless both a project and a task are selected. Starting an
    /// already-running timer is a no-op; the running flag guards against
    /// a second logical timer.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.project.is_none() || self.task.is_none() {
            return Err(TimerError::MissingSelection);
        }
        if self.running {
            tracing::debug!("timer already running, start ignored");
            return Ok(());
        }
        self.running = true;
        Ok(())
    }

    /// Advances the elapsed counter by one second while running.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs += 1;
        }
    }

    /// Halts tick accumulation without resetting the counter.
    ///
    /// A subsequent [`Timer::start`] resumes from the same count.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Ends the session at the given wall-clock instant.
    ///
    /// Emits a session when at least one second was accumulated and both
    /// a project and a task are selected; the start time is `now` minus
    /// the elapsed seconds. The elapsed counter and the transient notes
    /// are reset regardless of whether anything was emitted.
    pub fn stop(&mut self, now: NaiveDateTime) -> Option<StoppedSession> {
        let session = match (&self.project, &self.task) {
            (Some(project), Some(task)) if self.elapsed_secs > 0 => {
                let start_at = now - Duration::seconds(self.elapsed_secs);
                Some(StoppedSession {
                    project_id: project.clone(),
                    task_id: task.clone(),
                    date: start_at.date(),
                    start_time: start_at.time(),
                    end_time: now.time(),
                    duration_secs: self.elapsed_secs,
                    notes: self.notes.clone(),
                })
            }
            _ => None,
        };

        self.running = false;
        self.elapsed_secs = 0;
        self.notes = None;
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_ref(id: &str) -> TaskRef {
        TaskRef {
            id: TaskId::new(id).unwrap(),
            name: format!("Task {id}"),
        }
    }

    fn selected_timer() -> Timer {
        let mut timer = Timer::new();
        timer
            .select_project(
                ProjectId::new("proj-a").unwrap(),
                vec![task_ref("task-1"), task_ref("task-2")],
            )
            .unwrap();
        timer.select_task(TaskId::new("task-1").unwrap()).unwrap();
        timer
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn start_without_selection_fails_and_never_ticks() {
        let mut timer = Timer::new();
        assert_eq!(timer.start(), Err(TimerError::MissingSelection));

        // Project alone is not enough
        timer
            .select_project(ProjectId::new("proj-a").unwrap(), vec![task_ref("task-1")])
            .unwrap();
        assert_eq!(timer.start(), Err(TimerError::MissingSelection));

        timer.tick();
        timer.tick();
        assert_eq!(timer.elapsed_secs(), 0);
        assert!(timer.stop(noon()).is_none());
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let mut timer = selected_timer();
        timer.start().unwrap();
        timer.tick();
        timer.start().unwrap();
        timer.tick();
        assert_eq!(timer.elapsed_secs(), 2);
    }

    #[test]
    fn pause_halts_without_reset_and_start_resumes() {
        let mut timer = selected_timer();
        timer.start().unwrap();
        timer.tick();
        timer.tick();
        timer.pause();
        timer.tick();
        assert_eq!(timer.elapsed_secs(), 2);

        timer.start().unwrap();
        timer.tick();
        assert_eq!(timer.elapsed_secs(), 3);
    }

    #[test]
    fn stop_after_n_ticks_emits_exactly_that_duration() {
        let mut timer = selected_timer();
        timer.start().unwrap();
        for _ in 0..90 {
            timer.tick();
        }
        timer.set_notes(Some("standup".to_string()));

        let session = timer.stop(noon()).expect("should emit a session");
        assert_eq!(session.duration_secs, 90);
        assert_eq!(session.end_time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(
            session.start_time,
            NaiveTime::from_hms_opt(11, 58, 30).unwrap()
        );
        assert_eq!(session.notes.as_deref(), Some("standup"));

        // Counter and notes reset after stop
        assert_eq!(timer.elapsed_secs(), 0);
        assert_eq!(timer.notes(), None);
        assert!(!timer.is_running());
    }

    #[test]
    fn stop_with_zero_elapsed_emits_nothing_but_still_resets_notes() {
        let mut timer = selected_timer();
        timer.set_notes(Some("abandoned".to_string()));
        assert!(timer.stop(noon()).is_none());
        assert_eq!(timer.notes(), None);
        assert_eq!(timer.elapsed_secs(), 0);
    }

    #[test]
    fn stop_spanning_midnight_dates_the_start_day() {
        let mut timer = selected_timer();
        timer.start().unwrap();
        for _ in 0..120 {
            timer.tick();
        }
        let just_past_midnight = NaiveDate::from_ymd_opt(2025, 3, 11)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        let session = timer.stop(just_past_midnight).unwrap();
        assert_eq!(session.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(
            session.start_time,
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn switching_project_clears_task_and_repopulates_tasks() {
        let mut timer = selected_timer();
        assert!(timer.task().is_some());

        timer
            .select_project(
                ProjectId::new("proj-b").unwrap(),
                vec![task_ref("task-9")],
            )
            .unwrap();
        assert_eq!(timer.task(), None);
        assert_eq!(timer.available_tasks().len(), 1);
        assert_eq!(timer.available_tasks()[0].id, TaskId::new("task-9").unwrap());
    }

    #[test]
    fn switching_project_while_running_is_rejected() {
        let mut timer = selected_timer();
        timer.start().unwrap();
        let result = timer.select_project(ProjectId::new("proj-b").unwrap(), vec![]);
        assert_eq!(result, Err(TimerError::ProjectLocked));
        // Selection untouched
        assert_eq!(timer.project().unwrap().as_str(), "proj-a");
        assert!(timer.task().is_some());
    }

    #[test]
    fn selecting_task_outside_project_scope_fails() {
        let mut timer = selected_timer();
        let result = timer.select_task(TaskId::new("task-99").unwrap());
        assert_eq!(
            result,
            Err(TimerError::UnknownTask {
                task: TaskId::new("task-99").unwrap()
            })
        );
    }

    #[test]
    fn timer_snapshot_serde_roundtrip() {
        let mut timer = selected_timer();
        timer.start().unwrap();
        timer.tick();
        timer.pause();
        timer.set_notes(Some("carry over".to_string()));

        let json = serde_json::to_string(&timer).unwrap();
        let parsed: Timer = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timer);
    }
}
