//! CLI subcommand implementations.

pub mod employees;
pub mod entry;
pub mod projects;
pub mod report;
pub mod rewards;
pub mod timer;

mod util;
