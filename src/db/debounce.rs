use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

/// Collapses bursts of edits to the same day into one write.
///
/// Each edit pushes the day's deadline out by `window`; a day becomes due
/// once it has been quiet that long. Edits made after the last flush are
/// lost if the process dies before the next one.
///
/// A day whose write failed is parked: `take_due` skips it until the day is
/// edited again, and `take_all` still returns it.
#[derive(Debug)]
pub struct WriteDebouncer {
    window: Duration,
    pending: BTreeMap<NaiveDate, Instant>,
    failed: BTreeSet<NaiveDate>,
}

impl WriteDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: BTreeMap::new(),
            failed: BTreeSet::new(),
        }
    }

    pub fn schedule(&mut self, date: NaiveDate, now: Instant) {
        self.failed.remove(&date);
        self.pending.insert(date, now);
    }

    pub fn mark_failed(&mut self, date: NaiveDate) {
        self.pending.remove(&date);
        self.failed.insert(date);
    }

    /// Days not yet written, parked failures included.
    pub fn pending_count(&self) -> usize {
        self.pending.len() + self.failed.len()
    }

    /// Removes and returns the days that have been quiet for the full window.
    pub fn take_due(&mut self, now: Instant) -> Vec<NaiveDate> {
        let due: Vec<NaiveDate> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= self.window)
            .map(|(date, _)| *date)
            .collect();
        for date in &due {
            self.pending.remove(date);
        }
        due
    }

    pub fn take(&mut self, date: NaiveDate) -> bool {
        let failed = self.failed.remove(&date);
        self.pending.remove(&date).is_some() || failed
    }

    pub fn take_all(&mut self) -> Vec<NaiveDate> {
        let mut all: BTreeSet<NaiveDate> = std::mem::take(&mut self.failed);
        all.extend(std::mem::take(&mut self.pending).into_keys());
        all.into_iter().collect()
    }
}
