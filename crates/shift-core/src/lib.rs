//! Core domain logic for the shift time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Timer controller: elapsed-time accumulation for the active session
//! - Entry store: ordered time entries with filtering, totals, and the
//!   two-step delete flow
//! - Status lifecycles: approval transitions for time entries and reward
//!   assignments
//! - Remote contracts: traits for the project directory, reward service,
//!   and notification sink

pub mod entry;
pub mod remote;
pub mod status;
pub mod store;
pub mod timer;
pub mod types;

pub use entry::{EntryDraft, EntryError, TimeEntry};
pub use remote::{
    Employee, NewReward, NotificationSink, ProjectDirectory, ProjectRef, RemoteError, Reward,
    RewardAssignment, RewardPatch, RewardService, TaskRef,
};
pub use status::{EntryStatus, RewardStatus, TransitionError, UnknownStatus};
pub use store::{EntryQuery, EntryStore, StoreError, format_hours};
pub use timer::{StoppedSession, Timer, TimerError};
pub use types::{
    AssignmentId, EmployeeId, EntryId, ProjectId, RewardId, TaskId, ValidationError,
};
