use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

use crate::config::ChallengeConfig;
use crate::db::StoreError;
use crate::models::{ChallengeWindow, DayRecord, JournalEntry};

const DATE_FMT: &str = "%Y-%m-%d";

fn date_str(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| StoreError::BadDate(s.to_string()))
}

/// Where day records are read from and written to.
pub trait DayStore {
    /// Records with `start <= date <= end`, ordered by date.
    fn find_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>, StoreError>;
    fn upsert(&self, record: &DayRecord) -> Result<(), StoreError>;
}

impl DayStore for Connection {
    fn find_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>, StoreError> {
        DayRepo::find_range(self, start, end)
    }

    fn upsert(&self, record: &DayRecord) -> Result<(), StoreError> {
        DayRepo::upsert(self, record)
    }
}

// ─── Day records ─────────────────────────────────────────────────────────────

struct RawDay {
    date: String,
    has_read: bool,
    workouts_completed: u8,
    water_oz: f64,
    has_sleep: bool,
    sleep_hours: Option<f64>,
    sleep_manual: bool,
    supplements_taken: String,
    has_photo: bool,
    photo_thumbnail: Option<Vec<u8>>,
    photo_note: Option<String>,
    has_journaled: bool,
    weight: Option<f64>,
    note: Option<String>,
}

impl RawDay {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(RawDay {
            date: row.get(0)?,
            has_read: row.get(1)?,
            workouts_completed: row.get(2)?,
            water_oz: row.get(3)?,
            has_sleep: row.get(4)?,
            sleep_hours: row.get(5)?,
            sleep_manual: row.get(6)?,
            supplements_taken: row.get(7)?,
            has_photo: row.get(8)?,
            photo_thumbnail: row.get(9)?,
            photo_note: row.get(10)?,
            has_journaled: row.get(11)?,
            weight: row.get(12)?,
            note: row.get(13)?,
        })
    }

    fn into_record(self) -> Result<DayRecord, StoreError> {
        let supplements_taken: BTreeSet<String> = serde_json::from_str(&self.supplements_taken)?;
        Ok(DayRecord {
            date: parse_date(&self.date)?,
            has_read: self.has_read,
            workouts_completed: self.workouts_completed,
            water_oz: self.water_oz,
            has_sleep: self.has_sleep,
            sleep_hours: self.sleep_hours,
            sleep_manual: self.sleep_manual,
            supplements_taken,
            has_photo: self.has_photo,
            photo_thumbnail: self.photo_thumbnail,
            photo_note: self.photo_note,
            has_journaled: self.has_journaled,
            weight: self.weight,
            note: self.note,
        })
    }
}

const DAY_COLUMNS: &str = "date, has_read, workouts_completed, water_oz, has_sleep, sleep_hours,
     sleep_manual, supplements_taken, has_photo, photo_thumbnail, photo_note,
     has_journaled, weight, note";

pub struct DayRepo;

impl DayRepo {
    pub fn find_range(
        conn: &Connection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DayRecord>, StoreError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM day_records WHERE date >= ?1 AND date <= ?2 ORDER BY date",
            DAY_COLUMNS
        ))?;

        let rows = stmt.query_map(params![date_str(start), date_str(end)], RawDay::from_row)?;

        let mut result = Vec::new();
        for r in rows {
            result.push(r?.into_record()?);
        }
        Ok(result)
    }

    pub fn upsert(conn: &Connection, record: &DayRecord) -> Result<(), StoreError> {
        let supplements = serde_json::to_string(&record.supplements_taken)?;
        conn.execute(
            "INSERT INTO day_records (date, has_read, workouts_completed, water_oz, has_sleep,
                 sleep_hours, sleep_manual, supplements_taken, has_photo, photo_thumbnail,
                 photo_note, has_journaled, weight, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(date) DO UPDATE SET
                 has_read = ?2, workouts_completed = ?3, water_oz = ?4, has_sleep = ?5,
                 sleep_hours = ?6, sleep_manual = ?7, supplements_taken = ?8, has_photo = ?9,
                 photo_thumbnail = ?10, photo_note = ?11, has_journaled = ?12, weight = ?13,
                 note = ?14, updated_at = datetime('now')",
            params![
                date_str(record.date),
                record.has_read,
                record.workouts_completed,
                record.water_oz,
                record.has_sleep,
                record.sleep_hours,
                record.sleep_manual,
                supplements,
                record.has_photo,
                record.photo_thumbnail,
                record.photo_note,
                record.has_journaled,
                record.weight,
                record.note,
            ],
        )?;
        Ok(())
    }
}

// ─── Challenge window ────────────────────────────────────────────────────────

pub struct ChallengeRepo;

impl ChallengeRepo {
    pub fn get(conn: &Connection) -> Result<Option<ChallengeWindow>> {
        let row = conn
            .query_row(
                "SELECT start_date, duration_days, goal_water_oz FROM challenge WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, f64>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((start, duration_days, goal_water_oz)) => {
                let start_date = NaiveDate::parse_from_str(&start, DATE_FMT)
                    .map_err(|e| anyhow!("Bad challenge start '{}': {}", start, e))?;
                Ok(Some(ChallengeWindow::new(start_date, duration_days, goal_water_oz)))
            }
        }
    }

    pub fn save(conn: &Connection, window: &ChallengeWindow) -> Result<()> {
        conn.execute(
            "INSERT INTO challenge (id, start_date, duration_days, goal_water_oz)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                 start_date = ?1, duration_days = ?2, goal_water_oz = ?3,
                 updated_at = datetime('now')",
            params![
                date_str(window.start_date),
                window.duration_days,
                window.goal_water_oz
            ],
        )?;
        Ok(())
    }

    /// Returns the stored window, creating one that starts `today` if none exists.
    pub fn get_or_create(
        conn: &Connection,
        defaults: &ChallengeConfig,
        today: NaiveDate,
    ) -> Result<ChallengeWindow> {
        if let Some(window) = Self::get(conn)? {
            return Ok(window);
        }
        let window = ChallengeWindow::new(today, defaults.duration_days, defaults.goal_water_oz);
        Self::save(conn, &window)?;
        log::info!(
            "created {}-day challenge starting {}",
            window.duration_days,
            window.start_date
        );
        Ok(window)
    }
}

// ─── Journal ─────────────────────────────────────────────────────────────────

pub struct JournalRepo;

impl JournalRepo {
    fn query(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<JournalEntry>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, date, title, body, created_at) = r?;
            result.push(JournalEntry {
                id: Some(id),
                date: parse_date(&date)?,
                title,
                body,
                created_at,
            });
        }
        Ok(result)
    }

    pub fn add(conn: &Connection, entry: &JournalEntry) -> Result<i64> {
        conn.execute(
            "INSERT INTO journal_entries (date, title, body) VALUES (?1, ?2, ?3)",
            params![date_str(entry.date), entry.title, entry.body],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Newest first.
    pub fn list(conn: &Connection, limit: usize) -> Result<Vec<JournalEntry>> {
        Self::query(
            conn,
            "SELECT id, date, title, body, created_at FROM journal_entries
             ORDER BY date DESC, id DESC LIMIT ?1",
            &[&(limit as i64)],
        )
    }

    pub fn list_for_date(conn: &Connection, date: NaiveDate) -> Result<Vec<JournalEntry>> {
        Self::query(
            conn,
            "SELECT id, date, title, body, created_at FROM journal_entries
             WHERE date = ?1 ORDER BY id",
            &[&date_str(date)],
        )
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let n = conn.execute("DELETE FROM journal_entries WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }
}

// ─── Reset ───────────────────────────────────────────────────────────────────

/// Deletes every day record, journal entry and the challenge window.
pub fn reset_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
         DELETE FROM day_records;
         DELETE FROM journal_entries;
         DELETE FROM challenge;
         COMMIT;",
    )?;
    log::info!("all challenge data reset");
    Ok(())
}
