use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hardline", version, author, about = "A terminal companion for the 75 Hard challenge")]
pub struct Cli {
    /// Challenge day to act on (defaults to today)
    #[arg(long, global = true)]
    pub day: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the checklist for a day
    Status,
    /// Toggle a habit (read, workouts, water, sleep, supplements, photo, journal)
    Check {
        habit: String,
    },
    /// Log a workout (max two per day)
    Workout {
        /// Remove a logged workout instead
        #[arg(long)]
        undo: bool,
    },
    /// Add water in ounces
    Water {
        oz: f64,
        /// Replace the day's total instead of adding to it
        #[arg(long)]
        set: bool,
    },
    /// Toggle a configured supplement
    Supplement {
        name: String,
    },
    /// Record hours slept
    Sleep {
        hours: f64,
        /// Treat the value as coming from a health-data export
        #[arg(long)]
        imported: bool,
    },
    /// Record the day's progress photo
    Photo {
        /// Image file to store
        path: Option<PathBuf>,
        /// Caption for the photo
        #[arg(long)]
        note: Option<String>,
        /// Clear the day's photo so it can be retaken
        #[arg(long, conflicts_with = "path")]
        reset: bool,
    },
    /// Record body weight
    Weight {
        lbs: f64,
    },
    /// Set the day's note (empty clears it)
    Note {
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Journal entries
    Journal {
        #[command(subcommand)]
        action: JournalCommands,
    },
    /// Show completed days and streaks
    Stats,
    /// Show the whole challenge as a calendar
    Calendar,
    /// View or edit the challenge window
    Challenge {
        #[command(subcommand)]
        action: ChallengeCommands,
    },
    /// Show the daily reminder schedule
    Reminders,
    /// Delete all challenge data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum JournalCommands {
    /// Write an entry; the first line is the title
    Add {
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// List recent entries
    List {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Delete an entry by id
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChallengeCommands {
    /// Show the current challenge window
    Show,
    /// Change start date, duration or water goal
    Set {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Length in days
        #[arg(long)]
        duration: Option<u32>,
        /// Daily water goal in ounces
        #[arg(long)]
        water: Option<f64>,
    },
    /// Start a fresh window today, keeping duration and water goal
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_day_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["hardline", "water", "16", "--day", "3"]).unwrap();
        assert_eq!(cli.day, Some(3));
        assert!(matches!(cli.command, Some(Commands::Water { oz, set: false }) if oz == 16.0));
    }

    #[test]
    fn parses_challenge_set() {
        let cli = Cli::try_parse_from([
            "hardline", "challenge", "set", "--start", "2026-01-05", "--duration", "30",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Challenge {
                action: ChallengeCommands::Set { start, duration, water },
            }) => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 5));
                assert_eq!(duration, Some(30));
                assert_eq!(water, None);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn no_subcommand_launches_dashboard() {
        let cli = Cli::try_parse_from(["hardline"]).unwrap();
        assert!(cli.command.is_none());
    }
}
