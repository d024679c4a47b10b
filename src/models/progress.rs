use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DayRecord, DayStatus, Scoring};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub completed_days: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub photos_taken: u32,
    /// Days in the window that have already arrived.
    pub elapsed_days: u32,
}

impl ProgressSummary {
    pub fn completion_ratio(&self) -> f64 {
        if self.elapsed_days == 0 {
            0.0
        } else {
            self.completed_days as f64 / self.elapsed_days as f64
        }
    }
}

/// Walks a date-ordered window of days and derives the challenge stats.
pub struct ProgressAggregator<'a> {
    scoring: Scoring<'a>,
    today: NaiveDate,
}

impl<'a> ProgressAggregator<'a> {
    pub fn new(scoring: Scoring<'a>, today: NaiveDate) -> Self {
        Self { scoring, today }
    }

    pub fn classify(&self, days: &[(NaiveDate, Option<&DayRecord>)]) -> Vec<DayStatus> {
        days.iter()
            .map(|(date, record)| DayStatus::classify(*date, *record, self.today, &self.scoring))
            .collect()
    }

    pub fn summarize(&self, days: &[(NaiveDate, Option<&DayRecord>)]) -> ProgressSummary {
        let statuses = self.classify(days);

        let completed_days = statuses
            .iter()
            .filter(|s| **s == DayStatus::Completed)
            .count() as u32;

        let elapsed_days = statuses
            .iter()
            .filter(|s| **s != DayStatus::Upcoming)
            .count() as u32;

        let photos_taken = days
            .iter()
            .zip(&statuses)
            .filter(|((_, record), status)| {
                **status == DayStatus::Completed && record.is_some_and(|r| r.has_photo)
            })
            .count() as u32;

        ProgressSummary {
            completed_days,
            current_streak: current_streak(&statuses),
            longest_streak: longest_streak(&statuses),
            photos_taken,
            elapsed_days,
        }
    }
}

/// Longest run of completed days; upcoming days are skipped.
pub fn longest_streak(statuses: &[DayStatus]) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    for status in statuses {
        match status {
            DayStatus::Completed => {
                run += 1;
                best = best.max(run);
            }
            DayStatus::Missed => run = 0,
            DayStatus::Upcoming => {}
        }
    }
    best
}

/// Completed days counted backward from the end until the first missed day.
pub fn current_streak(statuses: &[DayStatus]) -> u32 {
    let mut streak = 0u32;
    for status in statuses.iter().rev() {
        match status {
            DayStatus::Completed => streak += 1,
            DayStatus::Missed => break,
            DayStatus::Upcoming => continue,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::DayStatus::{Completed as C, Missed as M, Upcoming as U};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn completed(date: NaiveDate, photo: bool) -> DayRecord {
        let mut r = DayRecord::new(date);
        r.has_read = true;
        r.workouts_completed = 2;
        r.water_oz = 128.0;
        r.has_sleep = true;
        r.has_photo = photo;
        r.has_journaled = true;
        r
    }

    #[test]
    fn streaks_from_statuses() {
        let statuses = [C, C, M, C];
        assert_eq!(longest_streak(&statuses), 2);
        assert_eq!(current_streak(&statuses), 1);
    }

    #[test]
    fn upcoming_days_are_skipped_by_both_scans() {
        let statuses = [C, C, C, U, U];
        assert_eq!(longest_streak(&statuses), 3);
        assert_eq!(current_streak(&statuses), 3);

        let statuses = [C, M, U, U];
        assert_eq!(current_streak(&statuses), 0);
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(current_streak(&[]), 0);
    }

    #[test]
    fn summarize_window() {
        let scoring = Scoring { goal_water_oz: 128.0, supplements: &[] };
        let today = start() + Duration::days(4);

        let records: Vec<DayRecord> = vec![
            completed(start(), true),
            completed(start() + Duration::days(1), false),
            // day 3 absent
            completed(start() + Duration::days(3), true),
            {
                let mut partial = DayRecord::new(start() + Duration::days(4));
                partial.has_photo = true;
                partial
            },
        ];

        let days: Vec<(NaiveDate, Option<&DayRecord>)> = (0..7)
            .map(|i| {
                let date = start() + Duration::days(i);
                (date, records.iter().find(|r| r.date == date))
            })
            .collect();

        let summary = ProgressAggregator::new(scoring, today).summarize(&days);
        assert_eq!(summary.completed_days, 3);
        assert_eq!(summary.longest_streak, 2);
        // Today is incomplete and counts as missed.
        assert_eq!(summary.current_streak, 0);
        // The photo on the incomplete day earns no credit.
        assert_eq!(summary.photos_taken, 2);
        assert_eq!(summary.elapsed_days, 5);
        assert!((summary.completion_ratio() - 0.6).abs() < 1e-9);
    }
}
