use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shift_cli::commands::{employees, entry, projects, report, rewards, timer};
use shift_cli::{
    Cli, Commands, Config, EntryAction, ProjectsAction, RewardsAction, TimerAction,
};
use shift_core::{EntryStatus, RewardStatus};

/// Load config and open the database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(shift_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = shift_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Timer { action }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            match action {
                TimerAction::Select { project, task } => {
                    timer::select(&mut stdout, &mut db, &config, project, task.as_deref())?;
                }
                TimerAction::Run => timer::run(&mut stdout, &mut db)?,
                TimerAction::Status => timer::status(&mut stdout, &db)?,
                TimerAction::Stop { notes } => timer::stop(&mut stdout, &mut db, notes.clone())?,
            }
        }
        Some(Commands::Entry { action }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            match action {
                EntryAction::Add {
                    project,
                    task,
                    date,
                    start,
                    end,
                    notes,
                } => {
                    entry::add(
                        &mut stdout,
                        &mut db,
                        project,
                        task,
                        *date,
                        *start,
                        *end,
                        notes.clone(),
                    )?;
                }
                EntryAction::List {
                    date,
                    project,
                    status,
                    json,
                } => {
                    entry::list(&mut stdout, &db, *date, project.as_deref(), *status, *json)?;
                }
                EntryAction::Delete { id, yes } => entry::delete(&mut stdout, &mut db, *id, *yes)?,
                EntryAction::Edit { id } => entry::edit(&mut stdout, &mut db, *id)?,
                EntryAction::Approve { id } => {
                    entry::set_status(
                        &mut stdout,
                        &mut db,
                        &config,
                        *id,
                        EntryStatus::Approved,
                        None,
                    )?;
                }
                EntryAction::Reject { id, reason } => {
                    entry::set_status(
                        &mut stdout,
                        &mut db,
                        &config,
                        *id,
                        EntryStatus::Rejected,
                        Some(reason.clone()),
                    )?;
                }
            }
        }
        Some(Commands::Report { status, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            report::run(&mut stdout, &db, *status, *json)?;
        }
        Some(Commands::Projects { action }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            match action {
                ProjectsAction::List => projects::list(&mut stdout, &config)?,
                ProjectsAction::Tasks { project } => {
                    projects::tasks(&mut stdout, &config, project)?;
                }
            }
        }
        Some(Commands::Rewards { action }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            match action {
                RewardsAction::List => rewards::list(&mut stdout, &config)?,
                RewardsAction::Create {
                    name,
                    points,
                    description,
                } => {
                    rewards::create(
                        &mut stdout,
                        &config,
                        name.clone(),
                        *points,
                        description.clone(),
                    )?;
                }
                RewardsAction::Assign { employee, reward } => {
                    rewards::assign(&mut stdout, &config, employee, reward)?;
                }
                RewardsAction::Approve { id } => {
                    rewards::set_status(&mut stdout, &config, id, RewardStatus::Approved)?;
                }
                RewardsAction::Claim { id } => {
                    rewards::set_status(&mut stdout, &config, id, RewardStatus::Claimed)?;
                }
            }
        }
        Some(Commands::Employees { owner }) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            employees::list(&mut stdout, &config, owner)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
