//! Reward commands: definitions, assignment, and the claim lifecycle.

use std::io::Write;

use anyhow::{Context, Result};

use shift_core::{EmployeeId, NewReward, RewardId, RewardService, RewardStatus};

use super::util;
use crate::Config;

pub fn list<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;
    let rewards = runtime
        .block_on(client.get_rewards())
        .context("failed to list rewards")?;

    if rewards.is_empty() {
        writeln!(writer, "No rewards.")?;
        return Ok(());
    }
    for reward in rewards {
        write!(writer, "{}: {} ({} points)", reward.id, reward.name, reward.points)?;
        if let Some(description) = &reward.description {
            write!(writer, " - {description}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn create<W: Write>(
    writer: &mut W,
    config: &Config,
    name: String,
    points: i64,
    description: Option<String>,
) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;
    let reward = runtime
        .block_on(client.create_reward(&NewReward {
            name,
            description,
            points,
        }))
        .context("failed to create reward")?;

    writeln!(writer, "Created reward {} ({}).", reward.id, reward.name)?;
    Ok(())
}

pub fn assign<W: Write>(
    writer: &mut W,
    config: &Config,
    employee: &str,
    reward: &str,
) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;
    let assignment = runtime
        .block_on(client.assign_reward(&EmployeeId::new(employee)?, &RewardId::new(reward)?))
        .context("failed to assign reward")?;

    writeln!(
        writer,
        "Assigned reward {} to {} (assignment {}, {}).",
        assignment.reward_id, assignment.employee_id, assignment.id, assignment.status,
    )?;
    Ok(())
}

/// Pushes an assignment to the given lifecycle stage.
///
/// Claiming targets `claimed` directly; the backend enforces that the
/// assignment is currently `approved` (the chain is strictly forward-only,
/// no skipping from `pending`).
pub fn set_status<W: Write>(
    writer: &mut W,
    config: &Config,
    id: &str,
    target: RewardStatus,
) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;
    let assignment_id = shift_core::AssignmentId::new(id)?;
    runtime
        .block_on(client.update_assignment_status(&assignment_id, target))
        .with_context(|| format!("failed to mark assignment {assignment_id} as {target}"))?;

    writeln!(writer, "Assignment {assignment_id} {target}.")?;
    Ok(())
}
