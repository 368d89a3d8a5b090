//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

use shift_core::EntryStatus;

/// Workforce time tracker.
///
/// Tracks time against projects and tasks, locally and against the shift
/// backend, and manages the approval lifecycle for entries and rewards.
#[derive(Debug, Parser)]
#[command(name = "shift", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Control the tracking timer.
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },

    /// Manage time entries.
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },

    /// Browse the project/task directory.
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },

    /// Manage rewards and their assignments.
    Rewards {
        #[command(subcommand)]
        action: RewardsAction,
    },

    /// List employees visible to an owner.
    Employees {
        /// Owner (employer) ID.
        #[arg(long)]
        owner: String,
    },

    /// Total tracked hours, optionally scoped to one status.
    Report {
        /// Restrict to entries with this status.
        #[arg(long)]
        status: Option<EntryStatus>,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// Timer subcommands.
#[derive(Debug, Subcommand)]
pub enum TimerAction {
    /// Select the project (and optionally a task) to track against.
    Select {
        /// Project ID.
        #[arg(long)]
        project: String,

        /// Task ID within the project.
        #[arg(long)]
        task: Option<String>,
    },

    /// Run the timer in the foreground until Ctrl-C pauses it.
    Run,

    /// Show the current selection and elapsed time.
    Status,

    /// Stop the session, emitting a pending entry if any time accrued.
    Stop {
        /// Notes for the emitted entry.
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Time entry subcommands.
#[derive(Debug, Subcommand)]
pub enum EntryAction {
    /// Add a manual entry.
    Add {
        /// Project ID.
        #[arg(long)]
        project: String,

        /// Task ID within the project.
        #[arg(long)]
        task: String,

        /// Calendar date (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,

        /// Start time (HH:MM:SS).
        #[arg(long)]
        start: NaiveTime,

        /// End time (HH:MM:SS); must be after the start time.
        #[arg(long)]
        end: NaiveTime,

        /// Free-text notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List entries, newest first.
    List {
        /// Only entries on this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Only entries for this project ID.
        #[arg(long)]
        project: Option<String>,

        /// Only entries with this status.
        #[arg(long)]
        status: Option<EntryStatus>,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Delete an entry (two-step: request first, then rerun with --yes).
    Delete {
        /// Entry ID.
        id: u64,

        /// Confirm a previously requested deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Remove an entry and print a prefilled `entry add` for resubmission.
    Edit {
        /// Entry ID.
        id: u64,
    },

    /// Approve a pending entry.
    Approve {
        /// Entry ID.
        id: u64,
    },

    /// Reject a pending entry.
    Reject {
        /// Entry ID.
        id: u64,

        /// Why the entry was rejected.
        #[arg(long)]
        reason: String,
    },
}

/// Project directory subcommands.
#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// List all projects.
    List,

    /// List the tasks under one project.
    Tasks {
        /// Project ID.
        project: String,
    },
}

/// Reward subcommands.
#[derive(Debug, Subcommand)]
pub enum RewardsAction {
    /// List reward definitions.
    List,

    /// Create a reward definition.
    Create {
        /// Reward name.
        #[arg(long)]
        name: String,

        /// Point value.
        #[arg(long)]
        points: i64,

        /// Optional description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Assign a reward to an employee (starts pending).
    Assign {
        /// Employee ID.
        #[arg(long)]
        employee: String,

        /// Reward ID.
        #[arg(long)]
        reward: String,
    },

    /// Approve a pending assignment.
    Approve {
        /// Assignment ID.
        id: String,
    },

    /// Claim an approved assignment.
    Claim {
        /// Assignment ID.
        id: String,
    },
}
