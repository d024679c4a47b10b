use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS challenge (
            id             INTEGER PRIMARY KEY CHECK(id = 1),
            start_date     TEXT NOT NULL,
            duration_days  INTEGER NOT NULL DEFAULT 75 CHECK(duration_days >= 1),
            goal_water_oz  REAL NOT NULL DEFAULT 128,
            updated_at     TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS day_records (
            date                TEXT PRIMARY KEY,
            has_read            INTEGER NOT NULL DEFAULT 0,
            workouts_completed  INTEGER NOT NULL DEFAULT 0
                                CHECK(workouts_completed BETWEEN 0 AND 2),
            water_oz            REAL NOT NULL DEFAULT 0
                                CHECK(water_oz BETWEEN 0 AND 200),
            has_sleep           INTEGER NOT NULL DEFAULT 0,
            sleep_hours         REAL,
            sleep_manual        INTEGER NOT NULL DEFAULT 0,
            supplements_taken   TEXT NOT NULL DEFAULT '[]',
            has_photo           INTEGER NOT NULL DEFAULT 0,
            photo_thumbnail     BLOB,
            photo_note          TEXT,
            has_journaled       INTEGER NOT NULL DEFAULT 0,
            weight              REAL,
            note                TEXT,
            updated_at          TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS journal_entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT NOT NULL,
            title       TEXT NOT NULL,
            body        TEXT NOT NULL DEFAULT '',
            created_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_journal_date ON journal_entries(date);
    ")?;
    Ok(())
}
