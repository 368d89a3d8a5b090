//! Employee listing for an owner.

use std::io::Write;

use anyhow::{Context, Result};

use shift_core::{EmployeeId, RewardService};

use super::util;
use crate::Config;

pub fn list<W: Write>(writer: &mut W, config: &Config, owner: &str) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;
    let employees = runtime
        .block_on(client.get_employees(&EmployeeId::new(owner)?))
        .context("failed to list employees")?;

    if employees.is_empty() {
        writeln!(writer, "No employees.")?;
        return Ok(());
    }
    for employee in employees {
        write!(writer, "{}: {}", employee.id, employee.name)?;
        if let Some(email) = &employee.email {
            write!(writer, " <{email}>")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
