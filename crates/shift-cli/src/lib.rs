//! Shift time tracker CLI library.
//!
//! This crate provides the CLI interface for the shift time tracker.

mod cli;
pub mod commands;
mod config;
mod ticker;

pub use cli::{Cli, Commands, EntryAction, ProjectsAction, RewardsAction, TimerAction};
pub use config::Config;
pub use ticker::Ticker;
