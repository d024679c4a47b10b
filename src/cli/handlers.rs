use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use crate::cli::args::{ChallengeCommands, JournalCommands};
use crate::config::AppConfig;
use crate::db::repository::{reset_all, ChallengeRepo, JournalRepo};
use crate::models::{ChallengeWindow, DayRecord, DayStatus, Habit, JournalEntry, Reminder, Scoring};
use crate::services::{ConsoleScheduler, ManualSleepSource, ReminderScheduler};
use crate::tracker::Tracker;
use crate::utils::format::{format_amount, format_oz, format_percent, pad_display, plural, progress_bar};

/// Largest prefix of a photo file kept as the stored thumbnail.
pub const MAX_THUMBNAIL_BYTES: usize = 256 * 1024;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const EMBER: &str = "\x1b[38;2;214;72;48m";

// ─── Day resolution ──────────────────────────────────────────────────────────

/// The day a command acts on: `--day N` or today, pulled into the window.
pub fn resolve_day(tracker: &Tracker, day: Option<u32>) -> Result<NaiveDate> {
    match day {
        Some(n) => tracker.navigator().jump_to_day(n).ok_or_else(|| {
            anyhow!(
                "Day {} is outside the {}-day challenge",
                n,
                tracker.window().duration_days
            )
        }),
        None => Ok(tracker.navigator().jump_to_today()),
    }
}

fn resolve_editable_day(tracker: &Tracker, day: Option<u32>) -> Result<NaiveDate> {
    let date = resolve_day(tracker, day)?;
    if date > tracker.today() {
        bail!(
            "Day {} ({}) hasn't arrived yet",
            tracker.window().current_day_number(date),
            date
        );
    }
    Ok(date)
}

fn day_label(tracker: &Tracker, date: NaiveDate) -> String {
    format!(
        "Day {}/{}",
        tracker.window().current_day_number(date),
        tracker.window().duration_days
    )
}

fn report(changed: bool, done: &str, unchanged: &str) {
    if changed {
        println_colored!(GREEN, "  ✓ {}", done);
    } else {
        println_colored!(DIM, "  · {}", unchanged);
    }
}

// ─── Status ──────────────────────────────────────────────────────────────────

fn habit_detail(record: &DayRecord, habit: Habit, scoring: &Scoring) -> String {
    match habit {
        Habit::Workouts => format!("{}/2", record.workouts_completed),
        Habit::Water => format!(
            "{} / {} ({})",
            format_oz(record.water_oz),
            format_oz(scoring.goal_water_oz),
            format_percent(record.water_progress_percentage(scoring.goal_water_oz))
        ),
        Habit::Sleep => record
            .sleep_hours
            .map(|h| format!("{}h", format_amount(h)))
            .unwrap_or_default(),
        Habit::Supplements if scoring.supplements.is_empty() => "none configured".to_string(),
        Habit::Supplements => scoring
            .supplements
            .iter()
            .map(|s| {
                let mark = if record.supplements_taken.contains(s) { "✓" } else { "○" };
                format!("{} {}", mark, s)
            })
            .collect::<Vec<_>>()
            .join("  "),
        Habit::Photo if record.photo_locked() => "locked".to_string(),
        _ => String::new(),
    }
}

pub fn handle_status(tracker: &Tracker, day: Option<u32>) -> Result<()> {
    let date = resolve_day(tracker, day)?;
    let record = tracker.record_or_default(date);
    let scoring = tracker.scoring();
    let pct = record.completion_percentage(&scoring);

    println!();
    println_colored!(
        EMBER,
        "  {}  ·  {}  ·  {}",
        day_label(tracker, date),
        date.format("%a %b %d, %Y"),
        tracker.window().state(tracker.today()).as_str()
    );
    println_colored!(DIM, "  Day status: {}", tracker.status_of(date).as_str());
    println!();

    for habit in Habit::all() {
        let done = record.is_habit_done(habit, &scoring);
        let (icon, color) = if done { ("●", GREEN) } else { ("○", DIM) };
        println!(
            "  {}{}\x1b[0m  {}{}",
            color,
            icon,
            pad_display(habit.display_name(), 18),
            habit_detail(&record, habit, &scoring)
        );
    }

    println!();
    let color = if pct >= 0.8 { GREEN } else { AMBER };
    println_colored!(color, "  {}  {}", progress_bar(pct, 20), format_percent(pct));

    if let Some(w) = record.weight {
        println!("  Weight: {} lbs", format_amount(w));
    }
    if let Some(note) = &record.note {
        println_colored!(DIM, "  Note: {}", note);
    }
    if let Some(note) = &record.photo_note {
        println_colored!(DIM, "  Photo: {}", note);
    }
    println!();
    Ok(())
}

// ─── Habit mutations ─────────────────────────────────────────────────────────

pub fn handle_check(tracker: &mut Tracker, day: Option<u32>, habit_str: &str) -> Result<()> {
    let habit = Habit::from_str(habit_str).map_err(|_| {
        let names: Vec<&str> = Habit::all().iter().map(|h| h.as_str()).collect();
        anyhow!("Unknown habit '{}'. Use: {}", habit_str, names.join(", "))
    })?;
    let date = resolve_editable_day(tracker, day)?;
    let changed = tracker.update(date, Instant::now(), |r, s| r.toggle_habit(habit, s));
    let done = tracker
        .record(date)
        .is_some_and(|r| r.is_habit_done(habit, &tracker.scoring()));

    if habit == Habit::Photo && !changed {
        println_colored!(AMBER, "  Photo already captured for {}; use `photo --reset` to retake", day_label(tracker, date));
        return Ok(());
    }
    let state = if done { "done" } else { "not done" };
    report(
        changed,
        &format!("{}: {} ({})", habit.display_name(), state, day_label(tracker, date)),
        &format!("{} unchanged", habit.display_name()),
    );
    Ok(())
}

pub fn handle_workout(tracker: &mut Tracker, day: Option<u32>, undo: bool) -> Result<()> {
    let date = resolve_editable_day(tracker, day)?;
    let changed = tracker.update(date, Instant::now(), |r, _| {
        if undo { r.decrement_workouts() } else { r.increment_workouts() }
    });
    let count = tracker.record_or_default(date).workouts_completed;
    report(
        changed,
        &format!("Workouts: {}/2", count),
        &format!("Workouts already at {}/2", count),
    );
    Ok(())
}

pub fn handle_water(tracker: &mut Tracker, day: Option<u32>, oz: f64, set: bool) -> Result<()> {
    let date = resolve_editable_day(tracker, day)?;
    let changed = tracker.update(date, Instant::now(), |r, _| {
        if set { r.set_water(oz) } else { r.add_water(oz) }
    });
    let record = tracker.record_or_default(date);
    let goal = tracker.window().goal_water_oz;
    report(
        changed,
        &format!(
            "Water: {} / {} {}",
            format_oz(record.water_oz),
            format_oz(goal),
            progress_bar(record.water_progress_percentage(goal), 10)
        ),
        &format!("Water stays at {}", format_oz(record.water_oz)),
    );
    Ok(())
}

pub fn handle_supplement(tracker: &mut Tracker, day: Option<u32>, name: &str) -> Result<()> {
    let id = tracker
        .supplements()
        .iter()
        .find(|s| s.eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| {
            if tracker.supplements().is_empty() {
                anyhow!("No supplements configured. Add them under `supplements` in config.toml")
            } else {
                anyhow!(
                    "Unknown supplement '{}'. Configured: {}",
                    name,
                    tracker.supplements().join(", ")
                )
            }
        })?;
    let date = resolve_editable_day(tracker, day)?;
    tracker.update(date, Instant::now(), |r, _| r.toggle_supplement(&id));
    let taken = tracker.record_or_default(date).supplements_taken.contains(&id);
    if taken {
        println_colored!(GREEN, "  ✓ {} taken", id);
    } else {
        println_colored!(DIM, "  ○ {} unmarked", id);
    }
    Ok(())
}

pub fn handle_sleep(tracker: &mut Tracker, day: Option<u32>, hours: f64, imported: bool) -> Result<()> {
    if !hours.is_finite() || !(0.0..=24.0).contains(&hours) {
        bail!("Sleep hours must be between 0 and 24");
    }
    let date = resolve_editable_day(tracker, day)?;
    let now = Instant::now();
    let goal = tracker.sleep_goal_hours();
    let changed = if imported {
        tracker.import_sleep(&ManualSleepSource::new(date, hours), date, now)
    } else {
        tracker.update(date, now, |r, _| r.set_sleep_hours(hours, goal))
    };

    if imported && !changed {
        println_colored!(DIM, "  · Sleep already entered by hand for {}; import ignored", date);
        return Ok(());
    }
    let record = tracker.record_or_default(date);
    let (color, verdict) = if record.has_sleep { (GREEN, "goal met") } else { (AMBER, "under goal") };
    println_colored!(
        color,
        "  Sleep: {}h ({}, goal {}h)",
        format_amount(hours),
        verdict,
        format_amount(goal)
    );
    Ok(())
}

pub fn handle_photo(
    conn: &Connection,
    tracker: &mut Tracker,
    day: Option<u32>,
    path: Option<&Path>,
    note: Option<String>,
    reset: bool,
) -> Result<()> {
    let date = resolve_editable_day(tracker, day)?;

    if reset {
        let changed = tracker.update_critical(conn, date, |r, _| r.reset_photo());
        report(changed, "Photo cleared", "No photo to clear");
        return Ok(());
    }

    let path = path.ok_or_else(|| anyhow!("Give a photo file, or --reset to clear the day's photo"))?;
    let mut bytes = std::fs::read(path).with_context(|| format!("Reading {:?}", path))?;
    bytes.truncate(MAX_THUMBNAIL_BYTES);

    let changed = tracker.update_critical(conn, date, |r, _| r.record_photo(bytes, note));
    if changed {
        println_colored!(GREEN, "  ✓ Progress photo saved for {}", day_label(tracker, date));
    } else {
        println_colored!(AMBER, "  Photo already captured for {}; use --reset to retake", day_label(tracker, date));
    }
    Ok(())
}

pub fn handle_weight(tracker: &mut Tracker, day: Option<u32>, lbs: f64) -> Result<()> {
    if !lbs.is_finite() || lbs <= 0.0 {
        bail!("Weight must be a positive number");
    }
    let date = resolve_editable_day(tracker, day)?;
    let changed = tracker.update(date, Instant::now(), |r, _| r.set_weight(Some(lbs)));
    report(
        changed,
        &format!("Weight: {} lbs", format_amount(lbs)),
        "Weight unchanged",
    );
    Ok(())
}

pub fn handle_note(tracker: &mut Tracker, day: Option<u32>, text: &[String]) -> Result<()> {
    let date = resolve_editable_day(tracker, day)?;
    let note = Some(text.join(" "));
    let changed = tracker.update(date, Instant::now(), |r, _| r.set_note(note));
    let cleared = tracker.record_or_default(date).note.is_none();
    report(
        changed,
        if cleared { "Note cleared" } else { "Note saved" },
        "Note unchanged",
    );
    Ok(())
}

// ─── Journal ─────────────────────────────────────────────────────────────────

pub fn handle_journal(
    conn: &Connection,
    tracker: &mut Tracker,
    day: Option<u32>,
    action: &JournalCommands,
) -> Result<()> {
    match action {
        JournalCommands::Add { text } => {
            let date = resolve_editable_day(tracker, day)?;
            let entry = JournalEntry::from_text(date, &text.join(" "));
            if entry.title.is_empty() {
                bail!("Journal entry is empty");
            }
            let id = JournalRepo::add(conn, &entry)?;
            tracker.update(date, Instant::now(), |r, _| r.mark_journaled());
            println_colored!(GREEN, "  ✓ Journal entry #{} saved for {}", id, day_label(tracker, date));
        }
        JournalCommands::List { limit } => {
            let entries = match day {
                Some(_) => JournalRepo::list_for_date(conn, resolve_day(tracker, day)?)?,
                None => JournalRepo::list(conn, *limit)?,
            };
            println!();
            if entries.is_empty() {
                println_colored!(DIM, "  No journal entries yet");
            }
            for e in &entries {
                println_colored!(
                    BOLD,
                    "  #{:<4} {}  {}  {}",
                    e.id.unwrap_or_default(),
                    e.date,
                    day_label(tracker, e.date),
                    e.title
                );
                if !e.body.is_empty() {
                    println_colored!(DIM, "        {}", e.body.replace('\n', "\n        "));
                }
            }
            println!();
        }
        JournalCommands::Delete { id } => {
            if JournalRepo::delete(conn, *id)? {
                println_colored!(GREEN, "  ✓ Deleted journal entry #{}", id);
            } else {
                println_colored!(AMBER, "  No journal entry #{}", id);
            }
        }
    }
    Ok(())
}

// ─── Stats & calendar ────────────────────────────────────────────────────────

pub fn handle_stats(tracker: &Tracker) -> Result<()> {
    let summary = tracker.summary();
    let window = tracker.window();
    let today = tracker.today();

    println!();
    println_colored!(EMBER, "  Challenge Progress");
    println!();
    println!(
        "  Window:      {} → {}  ({}, {} left)",
        window.start_date,
        window.end_date(),
        window.state(today).as_str(),
        plural(window.days_remaining(today), "day")
    );
    println_colored!(
        BOLD,
        "  Completed:   {} of {}  {}",
        summary.completed_days,
        window.duration_days,
        progress_bar(summary.completed_days as f64 / window.duration_days as f64, 20)
    );
    println_colored!(
        GREEN,
        "  Streak:      {} current  |  {} best",
        plural(summary.current_streak, "day"),
        plural(summary.longest_streak, "day")
    );
    println!("  Photos:      {}", summary.photos_taken);
    println!(
        "  Hit rate:    {} of elapsed days",
        format_percent(summary.completion_ratio())
    );
    println!();
    Ok(())
}

pub fn handle_calendar(tracker: &Tracker) -> Result<()> {
    let calendar = tracker.calendar();
    let today = tracker.today();

    println!();
    println_colored!(EMBER, "  {}-Day Calendar", tracker.window().duration_days);
    println_colored!(DIM, "  ● completed   ✗ missed   · upcoming   [ ] today");
    println!();

    for week in calendar.chunks(7) {
        print!("  ");
        for (date, status) in week {
            let (icon, color) = match status {
                DayStatus::Completed => ("●", GREEN),
                DayStatus::Missed => ("✗", RED),
                DayStatus::Upcoming => ("·", DIM),
            };
            let day_no = tracker.window().current_day_number(*date);
            if *date == today {
                print!("[{}{:>2}{}\x1b[0m]", color, day_no, icon);
            } else {
                print!(" {}{:>2}{}\x1b[0m ", color, day_no, icon);
            }
        }
        if let Some((first, _)) = week.first() {
            print!("  {}{} {:>2}\x1b[0m", DIM, first.format("%b"), first.day());
        }
        println!();
    }
    println!();
    Ok(())
}

// ─── Challenge ───────────────────────────────────────────────────────────────

pub fn handle_challenge(
    conn: &Connection,
    tracker: &mut Tracker,
    action: &ChallengeCommands,
) -> Result<()> {
    let current = tracker.window().clone();
    let updated = match action {
        ChallengeCommands::Show => {
            let today = tracker.today();
            println!();
            println_colored!(EMBER, "  Challenge");
            println!();
            println!("  Start:       {}", current.start_date);
            println!("  End:         {}", current.end_date());
            println!("  Duration:    {}", plural(current.duration_days, "day"));
            println!("  Water goal:  {}", format_oz(current.goal_water_oz));
            println!("  State:       {}", current.state(today).as_str());
            if current.is_active(today) {
                println!("  Today:       day {}", current.current_day_number(today));
            }
            println!();
            return Ok(());
        }
        ChallengeCommands::Set { start, duration, water } => ChallengeWindow::validated(
            start.unwrap_or(current.start_date),
            duration.unwrap_or(current.duration_days),
            water.unwrap_or(current.goal_water_oz),
        )?,
        ChallengeCommands::Restart => ChallengeWindow::validated(
            tracker.today(),
            current.duration_days,
            current.goal_water_oz,
        )?,
    };

    ChallengeRepo::save(conn, &updated)?;
    tracker.replace_window(conn, updated.clone())?;
    log::info!(
        "challenge window now {} for {} days",
        updated.start_date,
        updated.duration_days
    );
    println_colored!(
        GREEN,
        "  ✓ Challenge: {} → {} ({}, {} water)",
        updated.start_date,
        updated.end_date(),
        plural(updated.duration_days, "day"),
        format_oz(updated.goal_water_oz)
    );
    Ok(())
}

// ─── Reminders ───────────────────────────────────────────────────────────────

pub fn handle_reminders(config: &AppConfig) -> Result<()> {
    let reminders = Reminder::from_config(&config.reminders).context("Reading reminders from config")?;
    println!();
    println_colored!(EMBER, "  Daily Reminders");
    println!();
    let mut scheduler = ConsoleScheduler::new(io::stdout());
    if config.reminders.enabled {
        scheduler.schedule(&reminders)?;
    } else {
        scheduler.cancel_all()?;
    }
    println!();
    Ok(())
}

// ─── Reset ───────────────────────────────────────────────────────────────────

pub fn handle_reset(conn: &Connection, yes: bool) -> Result<()> {
    if !yes {
        println_colored!(
            AMBER,
            "  This deletes every day record, journal entry and the challenge itself."
        );
        println_colored!(DIM, "  Run `hardline reset --yes` to confirm.");
        return Ok(());
    }
    reset_all(conn)?;
    println_colored!(RED, "  All challenge data deleted. A new challenge starts on next launch.");
    Ok(())
}

/// Today's date in local time.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChallengeConfig;
    use crate::db::migrations::run_migrations;
    use crate::tracker::TrackerSettings;

    fn setup() -> (Connection, Tracker) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let window = ChallengeRepo::get_or_create(&conn, &ChallengeConfig::default(), today).unwrap();
        let tracker = Tracker::load(&conn, window, TrackerSettings::default(), today).unwrap();
        (conn, tracker)
    }

    #[test]
    fn oversized_duration_is_rejected_before_saving() {
        let (conn, mut tracker) = setup();
        let before = ChallengeRepo::get(&conn).unwrap();

        let set = ChallengeCommands::Set { start: None, duration: Some(200_000_000), water: None };
        assert!(handle_challenge(&conn, &mut tracker, &set).is_err());
        let far = ChallengeCommands::Set { start: Some(NaiveDate::MAX), duration: None, water: None };
        assert!(handle_challenge(&conn, &mut tracker, &far).is_err());

        assert_eq!(ChallengeRepo::get(&conn).unwrap(), before);
        assert_eq!(tracker.window().duration_days, 75);
    }

    #[test]
    fn valid_edit_is_saved_and_reloaded() {
        let (conn, mut tracker) = setup();
        let set = ChallengeCommands::Set { start: None, duration: Some(30), water: Some(100.0) };
        handle_challenge(&conn, &mut tracker, &set).unwrap();
        assert_eq!(ChallengeRepo::get(&conn).unwrap().unwrap().duration_days, 30);
        assert_eq!(tracker.window().goal_water_oz, 100.0);
    }

    #[test]
    fn unknown_habit_error_lists_every_habit() {
        let (_conn, mut tracker) = setup();
        let err = handle_check(&mut tracker, None, "meditate").unwrap_err().to_string();
        assert!(err.contains("read, workouts, water, sleep, supplements, photo, journal"));
    }
}
