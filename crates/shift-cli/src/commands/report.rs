//! Report command: total tracked hours, optionally scoped by status.

use std::io::Write;

use anyhow::Result;

use shift_core::{EntryQuery, EntryStatus};
use shift_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    status: Option<EntryStatus>,
    json: bool,
) -> Result<()> {
    let store = db.load_store()?;
    let entries = store
        .filter(&EntryQuery {
            status,
            ..EntryQuery::default()
        })
        .len();
    let hours = store.total_hours(status);

    if json {
        let output = serde_json::json!({
            "status": status.map(EntryStatus::as_str),
            "entries": entries,
            "hours": hours,
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    match status {
        Some(status) => writeln!(writer, "{entries} {status} entries, {hours} hours.")?,
        None => writeln!(writer, "{entries} entries, {hours} hours.")?,
    }
    Ok(())
}
