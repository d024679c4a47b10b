use chrono::{Duration, NaiveDate};
use std::str::FromStr;

use crate::models::ChallengeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prev" | "previous" | "back" => Ok(Direction::Previous),
            "next" | "forward" => Ok(Direction::Next),
            _ => Err(anyhow::anyhow!("Unknown direction: {}", s)),
        }
    }
}

/// Bounds day selection to `[start_date, min(today, end_date)]`. Moves past
/// a boundary are no-ops.
#[derive(Debug, Clone, Copy)]
pub struct DayNavigator {
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    duration_days: u32,
}

impl DayNavigator {
    pub fn new(window: &ChallengeWindow, today: NaiveDate) -> Self {
        Self {
            start: window.start_date,
            end: window.end_date(),
            today,
            duration_days: window.duration_days,
        }
    }

    fn upper_bound(&self) -> NaiveDate {
        self.today.min(self.end)
    }

    pub fn can_go_to_previous_day(&self, current: NaiveDate) -> bool {
        current > self.start
    }

    pub fn can_go_to_next_day(&self, current: NaiveDate) -> bool {
        current < self.upper_bound()
    }

    pub fn navigate(&self, current: NaiveDate, direction: Direction) -> NaiveDate {
        match direction {
            Direction::Previous if self.can_go_to_previous_day(current) => {
                current - Duration::days(1)
            }
            Direction::Next if self.can_go_to_next_day(current) => current + Duration::days(1),
            _ => current,
        }
    }

    /// `None` when `day` is outside `[1, duration_days]`.
    pub fn jump_to_day(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.duration_days {
            return None;
        }
        self.start.checked_add_signed(Duration::days(day as i64 - 1))
    }

    /// Today, pulled back into the window when the challenge has not started
    /// or is already over.
    pub fn jump_to_today(&self) -> NaiveDate {
        self.today.clamp(self.start, self.end)
    }
}
