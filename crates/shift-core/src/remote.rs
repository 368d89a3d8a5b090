//! Contracts for the external collaborators.
//!
//! Projects, tasks, rewards, and employees are owned by an external
//! backend; this crate only defines the shapes it consumes and the traits
//! a client must implement. Remote failures surface as [`RemoteError`];
//! callers log and notify but do not retry, and already-applied local
//! state is not rolled back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::{RewardStatus, TransitionError};
use crate::types::{AssignmentId, EmployeeId, ProjectId, RewardId, TaskId};

/// A failed call to an external collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("remote operation failed: {0}")]
pub struct RemoteError(String);

impl RemoteError {
    /// Wraps a failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A project as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
}

/// A task as listed by the directory, scoped under one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: TaskId,
    pub name: String,
}

/// A reward definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: RewardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub points: i64,
}

/// Fields for creating a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReward {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub points: i64,
}

/// Partial update to a reward; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
}

/// An employee as listed by the reward service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A reward granted to an employee, moving through the claim lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAssignment {
    pub id: AssignmentId,
    pub employee_id: EmployeeId,
    pub reward_id: RewardId,
    pub date_awarded: NaiveDate,
    #[serde(default)]
    pub status: RewardStatus,
}

impl RewardAssignment {
    /// Moves the assignment to approved. Only valid from pending.
    pub fn approve(&mut self) -> Result<(), TransitionError> {
        self.status = self.status.transition_to(RewardStatus::Approved)?;
        Ok(())
    }

    /// Moves the assignment to claimed. Only valid from approved; claiming
    /// a pending assignment must go through approval first.
    pub fn claim(&mut self) -> Result<(), TransitionError> {
        self.status = self.status.transition_to(RewardStatus::Claimed)?;
        Ok(())
    }
}

/// The project/task directory.
pub trait ProjectDirectory {
    /// Lists all projects visible to the caller.
    fn list_projects(&self) -> impl Future<Output = Result<Vec<ProjectRef>, RemoteError>>;

    /// Lists the tasks under one project.
    fn list_tasks(
        &self,
        project: &ProjectId,
    ) -> impl Future<Output = Result<Vec<TaskRef>, RemoteError>>;
}

/// The reward service.
pub trait RewardService {
    fn get_rewards(&self) -> impl Future<Output = Result<Vec<Reward>, RemoteError>>;

    fn create_reward(&self, reward: &NewReward)
    -> impl Future<Output = Result<Reward, RemoteError>>;

    fn update_reward(
        &self,
        id: &RewardId,
        patch: &RewardPatch,
    ) -> impl Future<Output = Result<Reward, RemoteError>>;

    fn assign_reward(
        &self,
        employee: &EmployeeId,
        reward: &RewardId,
    ) -> impl Future<Output = Result<RewardAssignment, RemoteError>>;

    /// Pushes a locally validated status change for an assignment.
    fn update_assignment_status(
        &self,
        id: &AssignmentId,
        status: RewardStatus,
    ) -> impl Future<Output = Result<(), RemoteError>>;

    fn get_employees(
        &self,
        owner: &EmployeeId,
    ) -> impl Future<Output = Result<Vec<Employee>, RemoteError>>;
}

/// The notification sink. Fire-and-forget: callers do not consume any
/// return value beyond logging a failure.
pub trait NotificationSink {
    fn notify_success(
        &self,
        title: &str,
        message: &str,
    ) -> impl Future<Output = Result<(), RemoteError>>;

    fn notify_error(
        &self,
        title: &str,
        message: &str,
    ) -> impl Future<Output = Result<(), RemoteError>>;
}
