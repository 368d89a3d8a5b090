//! Project directory commands.

use std::io::Write;

use anyhow::{Context, Result};

use shift_core::{ProjectDirectory, ProjectId};

use super::util;
use crate::Config;

pub fn list<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;
    let projects = runtime
        .block_on(client.list_projects())
        .context("failed to list projects")?;

    if projects.is_empty() {
        writeln!(writer, "No projects.")?;
        return Ok(());
    }
    for project in projects {
        writeln!(writer, "{}: {}", project.id, project.name)?;
    }
    Ok(())
}

pub fn tasks<W: Write>(writer: &mut W, config: &Config, project: &str) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;
    let project_id = ProjectId::new(project)?;
    let tasks = runtime
        .block_on(client.list_tasks(&project_id))
        .context("failed to list tasks")?;

    if tasks.is_empty() {
        writeln!(writer, "No tasks under {project_id}.")?;
        return Ok(());
    }
    for task in tasks {
        writeln!(writer, "{}: {}", task.id, task.name)?;
    }
    Ok(())
}
