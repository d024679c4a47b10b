use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::db::{DayStore, StoreError, WriteDebouncer};
use crate::models::{
    ChallengeWindow, DayNavigator, DayRecord, DayStatus, Direction, ProgressAggregator,
    ProgressSummary, Scoring,
};
use crate::services::SleepSource;

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub supplements: Vec<String>,
    pub sleep_goal_hours: f64,
    pub debounce: Duration,
}

impl TrackerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            supplements: config.supplements.clone(),
            sleep_goal_hours: config.sleep.goal_hours,
            debounce: Duration::from_millis(config.persistence.debounce_ms),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Session state for one challenge: the selected day plus every loaded
/// record. In-memory records are what reads see; the store catches up
/// through debounced writes.
pub struct Tracker {
    window: ChallengeWindow,
    settings: TrackerSettings,
    today: NaiveDate,
    selected: NaiveDate,
    records: BTreeMap<NaiveDate, DayRecord>,
    debouncer: WriteDebouncer,
}

impl Tracker {
    pub fn load(
        store: &dyn DayStore,
        window: ChallengeWindow,
        settings: TrackerSettings,
        today: NaiveDate,
    ) -> Result<Self, StoreError> {
        let records = store
            .find_range(window.start_date, window.end_date())?
            .into_iter()
            .map(|r| (r.date, r))
            .collect();
        let selected = DayNavigator::new(&window, today).jump_to_today();
        let debouncer = WriteDebouncer::new(settings.debounce);
        Ok(Self {
            window,
            settings,
            today,
            selected,
            records,
            debouncer,
        })
    }

    pub fn window(&self) -> &ChallengeWindow {
        &self.window
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn supplements(&self) -> &[String] {
        &self.settings.supplements
    }

    pub fn sleep_goal_hours(&self) -> f64 {
        self.settings.sleep_goal_hours
    }

    pub fn scoring(&self) -> Scoring<'_> {
        Scoring {
            goal_water_oz: self.window.goal_water_oz,
            supplements: &self.settings.supplements,
        }
    }

    pub fn navigator(&self) -> DayNavigator {
        DayNavigator::new(&self.window, self.today)
    }

    pub fn record(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.records.get(&date)
    }

    pub fn record_or_default(&self, date: NaiveDate) -> DayRecord {
        self.records
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DayRecord::new(date))
    }

    pub fn selected_record(&self) -> DayRecord {
        self.record_or_default(self.selected)
    }

    pub fn selected_day_number(&self) -> u32 {
        self.window.current_day_number(self.selected)
    }

    // ─── Navigation ──────────────────────────────────────────────────────────

    pub fn go(&mut self, direction: Direction) -> bool {
        let next = self.navigator().navigate(self.selected, direction);
        let moved = next != self.selected;
        self.selected = next;
        moved
    }

    pub fn go_to_today(&mut self) {
        self.selected = self.navigator().jump_to_today();
    }

    /// Out-of-range days and days that have not arrived yet are ignored.
    pub fn jump_to_day(&mut self, day: u32) -> bool {
        match self.navigator().jump_to_day(day) {
            Some(date) if date <= self.today => {
                self.selected = date;
                true
            }
            _ => false,
        }
    }

    /// Moves "today" forward at midnight. A selection that was on the old
    /// today follows along.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today == self.today {
            return;
        }
        let followed = self.selected == self.today;
        self.today = today;
        if followed {
            self.go_to_today();
        }
    }

    // ─── Mutation ────────────────────────────────────────────────────────────

    fn editable(&self, date: NaiveDate) -> bool {
        self.window.is_within_window(date) && date <= self.today
    }

    /// Applies `f` to the record for `date`, creating it if needed, and
    /// schedules a debounced write when `f` reports a change.
    pub fn update<F>(&mut self, date: NaiveDate, now: Instant, f: F) -> bool
    where
        F: FnOnce(&mut DayRecord, &Scoring<'_>) -> bool,
    {
        if !self.editable(date) {
            log::debug!("ignoring edit to {} outside the editable range", date);
            return false;
        }
        let scoring = Scoring {
            goal_water_oz: self.window.goal_water_oz,
            supplements: &self.settings.supplements,
        };
        let record = self
            .records
            .entry(date)
            .or_insert_with(|| DayRecord::new(date));
        let changed = f(record, &scoring);
        if changed {
            self.debouncer.schedule(date, now);
        }
        changed
    }

    pub fn update_selected<F>(&mut self, now: Instant, f: F) -> bool
    where
        F: FnOnce(&mut DayRecord, &Scoring<'_>) -> bool,
    {
        self.update(self.selected, now, f)
    }

    /// Like `update`, but writes through immediately.
    pub fn update_critical<F>(&mut self, store: &dyn DayStore, date: NaiveDate, f: F) -> bool
    where
        F: FnOnce(&mut DayRecord, &Scoring<'_>) -> bool,
    {
        let now = Instant::now();
        let changed = self.update(date, now, f);
        if changed {
            self.debouncer.take(date);
            self.write(store, date);
        }
        changed
    }

    pub fn import_sleep(&mut self, source: &dyn SleepSource, date: NaiveDate, now: Instant) -> bool {
        let Some(hours) = source.sleep_hours(date) else {
            return false;
        };
        let goal = self.settings.sleep_goal_hours;
        self.update(date, now, |r, _| r.apply_imported_sleep(hours, goal))
    }

    // ─── Persistence ─────────────────────────────────────────────────────────

    fn write(&mut self, store: &dyn DayStore, date: NaiveDate) -> bool {
        let Some(record) = self.records.get(&date) else {
            return false;
        };
        match store.upsert(record) {
            Ok(()) => true,
            Err(e) => {
                // Parked until the day is edited again or everything is flushed.
                log::warn!("saving {} failed: {}", date, e);
                self.debouncer.mark_failed(date);
                false
            }
        }
    }

    /// Writes every day that has been quiet for the debounce window.
    pub fn flush_due(&mut self, store: &dyn DayStore, now: Instant) -> usize {
        let due = self.debouncer.take_due(now);
        let written = due.into_iter().filter(|d| self.write(store, *d)).count();
        if written > 0 {
            log::debug!("flushed {} day record(s)", written);
        }
        written
    }

    pub fn flush_all(&mut self, store: &dyn DayStore) -> usize {
        let pending = self.debouncer.take_all();
        pending.into_iter().filter(|d| self.write(store, *d)).count()
    }

    pub fn has_pending_writes(&self) -> bool {
        self.debouncer.pending_count() > 0
    }

    /// Swaps in an edited window, flushing first and reloading its range.
    pub fn replace_window(
        &mut self,
        store: &dyn DayStore,
        window: ChallengeWindow,
    ) -> Result<(), StoreError> {
        self.flush_all(store);
        let fresh = Tracker::load(store, window, self.settings.clone(), self.today)?;
        *self = fresh;
        Ok(())
    }

    // ─── Progress ────────────────────────────────────────────────────────────

    pub fn days(&self) -> Vec<(NaiveDate, Option<&DayRecord>)> {
        self.window
            .dates()
            .map(|date| (date, self.records.get(&date)))
            .collect()
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressAggregator::new(self.scoring(), self.today).summarize(&self.days())
    }

    pub fn status_of(&self, date: NaiveDate) -> DayStatus {
        DayStatus::classify(date, self.records.get(&date), self.today, &self.scoring())
    }

    pub fn calendar(&self) -> Vec<(NaiveDate, DayStatus)> {
        let days = self.days();
        let statuses = ProgressAggregator::new(self.scoring(), self.today).classify(&days);
        days.into_iter().map(|(d, _)| d).zip(statuses).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::repository::DayRepo;
    use crate::services::ManualSleepSource;
    use rusqlite::Connection;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn saved(conn: &Connection, date: NaiveDate) -> Option<DayRecord> {
        DayRepo::find_range(conn, date, date).unwrap().pop()
    }

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn tracker(store: &dyn DayStore, today: NaiveDate) -> Tracker {
        let window = ChallengeWindow::new(d(1), 10, 128.0);
        Tracker::load(store, window, TrackerSettings::default(), today).unwrap()
    }

    struct FailingStore;

    impl DayStore for FailingStore {
        fn find_range(&self, _: NaiveDate, _: NaiveDate) -> Result<Vec<DayRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn upsert(&self, record: &DayRecord) -> Result<(), StoreError> {
            Err(StoreError::BadDate(record.date.to_string()))
        }
    }

    #[test]
    fn loads_existing_records_and_selects_today() {
        let conn = conn();
        let mut r = DayRecord::new(d(2));
        r.has_read = true;
        DayRepo::upsert(&conn, &r).unwrap();

        let t = tracker(&conn, d(5));
        assert_eq!(t.selected(), d(5));
        assert_eq!(t.selected_day_number(), 5);
        assert!(t.record(d(2)).unwrap().has_read);
        assert!(t.record(d(3)).is_none());
    }

    #[test]
    fn edits_are_visible_before_the_write_lands() {
        let conn = conn();
        let mut t = tracker(&conn, d(5));
        let t0 = Instant::now();

        assert!(t.update(d(5), t0, |r, _| r.toggle_read()));
        assert!(t.update(d(5), t0 + Duration::from_millis(100), |r, _| r.increment_workouts()));
        assert!(t.selected_record().has_read);
        assert_eq!(t.selected_record().workouts_completed, 1);
        assert!(saved(&conn, d(5)).is_none());

        assert_eq!(t.flush_due(&conn, t0 + Duration::from_millis(200)), 0);
        assert_eq!(t.flush_due(&conn, t0 + Duration::from_millis(400)), 1);
        assert!(!t.has_pending_writes());
        let saved = saved(&conn, d(5)).unwrap();
        assert!(saved.has_read);
        assert_eq!(saved.workouts_completed, 1);
    }

    #[test]
    fn no_op_edits_schedule_nothing() {
        let conn = conn();
        let mut t = tracker(&conn, d(5));
        let now = Instant::now();
        t.update(d(5), now, |r, _| {
            r.workouts_completed = 2;
            true
        });
        t.flush_all(&conn);
        assert!(!t.update(d(5), now, |r, _| r.increment_workouts()));
        assert!(!t.has_pending_writes());
    }

    #[test]
    fn edits_outside_editable_range_are_ignored() {
        let conn = conn();
        let mut t = tracker(&conn, d(5));
        let now = Instant::now();
        assert!(!t.update(d(6), now, |r, _| r.toggle_read()));
        assert!(!t.update(d(1) - chrono::Duration::days(1), now, |r, _| r.toggle_read()));
        assert!(t.record(d(6)).is_none());
        assert!(!t.has_pending_writes());
    }

    #[test]
    fn critical_update_writes_immediately() {
        let conn = conn();
        let mut t = tracker(&conn, d(5));
        assert!(t.update_critical(&conn, d(4), |r, _| r.record_photo(vec![1, 2, 3], None)));
        assert!(!t.has_pending_writes());
        let saved = saved(&conn, d(4)).unwrap();
        assert!(saved.photo_locked());
    }

    struct CountingFailStore(std::cell::Cell<usize>);

    impl DayStore for CountingFailStore {
        fn find_range(&self, _: NaiveDate, _: NaiveDate) -> Result<Vec<DayRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn upsert(&self, record: &DayRecord) -> Result<(), StoreError> {
            self.0.set(self.0.get() + 1);
            Err(StoreError::BadDate(record.date.to_string()))
        }
    }

    #[test]
    fn failed_write_stays_pending_and_memory_stays_authoritative() {
        let store = FailingStore;
        let mut t = tracker(&store, d(5));
        t.update(d(5), Instant::now(), |r, _| r.toggle_read());
        assert_eq!(t.flush_all(&store), 0);
        assert!(t.has_pending_writes());
        assert!(t.selected_record().has_read);

        let conn = conn();
        assert_eq!(t.flush_all(&conn), 1);
        assert!(saved(&conn, d(5)).unwrap().has_read);
    }

    #[test]
    fn failed_write_waits_for_next_edit_instead_of_every_tick() {
        let store = CountingFailStore(std::cell::Cell::new(0));
        let mut t = tracker(&store, d(5));
        let t0 = Instant::now();
        t.update(d(5), t0, |r, _| r.toggle_read());

        for i in 1..=10 {
            t.flush_due(&store, t0 + Duration::from_millis(400 * i));
        }
        assert_eq!(store.0.get(), 1);
        assert!(t.has_pending_writes());

        let later = t0 + Duration::from_secs(10);
        t.update(d(5), later, |r, _| r.add_water(8.0));
        t.flush_due(&store, later + Duration::from_millis(400));
        assert_eq!(store.0.get(), 2);
    }

    #[test]
    fn navigation_is_bounded() {
        let conn = conn();
        let mut t = tracker(&conn, d(3));
        assert!(!t.go(Direction::Next));
        assert!(t.go(Direction::Previous));
        assert!(t.go(Direction::Previous));
        assert_eq!(t.selected(), d(1));
        assert!(!t.go(Direction::Previous));
        assert_eq!(t.selected(), d(1));

        assert!(!t.jump_to_day(0));
        assert!(!t.jump_to_day(11));
        assert!(!t.jump_to_day(9)); // not yet arrived
        assert!(t.jump_to_day(2));
        assert_eq!(t.selected(), d(2));
        t.go_to_today();
        assert_eq!(t.selected(), d(3));
    }

    #[test]
    fn selection_follows_midnight_rollover() {
        let conn = conn();
        let mut t = tracker(&conn, d(3));
        t.set_today(d(4));
        assert_eq!(t.selected(), d(4));

        t.go(Direction::Previous);
        t.set_today(d(5));
        assert_eq!(t.selected(), d(3));
    }

    #[test]
    fn summary_and_calendar_cover_the_window() {
        let conn = conn();
        let mut t = tracker(&conn, d(3));
        let now = Instant::now();
        for day in [1, 2] {
            t.update(d(day), now, |r, s| {
                r.has_read = true;
                r.workouts_completed = 2;
                r.water_oz = s.goal_water_oz;
                r.has_sleep = true;
                r.has_photo = true;
                r.has_journaled = true;
                true
            });
        }
        let summary = t.summary();
        assert_eq!(summary.completed_days, 2);
        assert_eq!(summary.longest_streak, 2);
        assert_eq!(summary.current_streak, 0); // today not done yet
        assert_eq!(summary.photos_taken, 2);

        let calendar = t.calendar();
        assert_eq!(calendar.len(), 10);
        assert_eq!(calendar[0].1, DayStatus::Completed);
        assert_eq!(calendar[2].1, DayStatus::Missed);
        assert_eq!(calendar[3].1, DayStatus::Upcoming);
        assert_eq!(t.status_of(d(2)), DayStatus::Completed);
    }

    #[test]
    fn imported_sleep_respects_manual_entry() {
        let conn = conn();
        let mut t = tracker(&conn, d(5));
        let now = Instant::now();
        assert!(t.import_sleep(&ManualSleepSource::new(d(5), 8.0), d(5), now));
        assert!(t.record(d(5)).unwrap().has_sleep);

        t.update(d(4), now, |r, _| r.set_sleep_hours(5.0, 7.0));
        assert!(!t.import_sleep(&ManualSleepSource::new(d(4), 9.0), d(4), now));
        assert_eq!(t.record(d(4)).unwrap().sleep_hours, Some(5.0));
    }

    #[test]
    fn replace_window_flushes_and_reloads() {
        let conn = conn();
        let mut t = tracker(&conn, d(5));
        t.update(d(5), Instant::now(), |r, _| r.toggle_read());
        t.replace_window(&conn, ChallengeWindow::new(d(4), 30, 100.0)).unwrap();
        assert_eq!(t.window().duration_days, 30);
        assert!(t.record(d(5)).unwrap().has_read);
        assert!(!t.has_pending_writes());
        assert_eq!(t.scoring().goal_water_oz, 100.0);
    }
}
