mod cli;
mod config;
mod db;
mod models;
mod services;
mod tracker;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::ChallengeRepo;
use tracker::{Tracker, TrackerSettings};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    // Reset must not recreate the challenge it just deleted.
    if let Some(Commands::Reset { yes }) = cli.command {
        return handlers::handle_reset(&conn, yes);
    }

    let today = handlers::local_today();
    let window = ChallengeRepo::get_or_create(&conn, &config.challenge, today)?;
    let mut tracker = Tracker::load(&conn, window, TrackerSettings::from_config(&config), today)
        .context("Loading day records")?;

    let day = cli.day;
    match cli.command {
        Some(cmd) => {
            match cmd {
                Commands::Status => handlers::handle_status(&tracker, day)?,
                Commands::Check { habit } => handlers::handle_check(&mut tracker, day, &habit)?,
                Commands::Workout { undo } => handlers::handle_workout(&mut tracker, day, undo)?,
                Commands::Water { oz, set } => handlers::handle_water(&mut tracker, day, oz, set)?,
                Commands::Supplement { name } => {
                    handlers::handle_supplement(&mut tracker, day, &name)?
                }
                Commands::Sleep { hours, imported } => {
                    handlers::handle_sleep(&mut tracker, day, hours, imported)?
                }
                Commands::Photo { path, note, reset } => handlers::handle_photo(
                    &conn,
                    &mut tracker,
                    day,
                    path.as_deref(),
                    note,
                    reset,
                )?,
                Commands::Weight { lbs } => handlers::handle_weight(&mut tracker, day, lbs)?,
                Commands::Note { text } => handlers::handle_note(&mut tracker, day, &text)?,
                Commands::Journal { action } => {
                    handlers::handle_journal(&conn, &mut tracker, day, &action)?
                }
                Commands::Stats => handlers::handle_stats(&tracker)?,
                Commands::Calendar => handlers::handle_calendar(&tracker)?,
                Commands::Challenge { action } => {
                    handlers::handle_challenge(&conn, &mut tracker, &action)?
                }
                Commands::Reminders => handlers::handle_reminders(&config)?,
                Commands::Reset { .. } => unreachable!(),
            }

            // One-shot commands write everything before exiting.
            tracker.flush_all(&conn);
            if tracker.has_pending_writes() {
                log::error!("some changes could not be saved");
            }
        }

        // No subcommand → launch TUI
        None => {
            if let Some(n) = day {
                tracker.jump_to_day(n);
            }
            tui::app::run(conn, tracker)?;
        }
    }

    Ok(())
}
