use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DURATION_DAYS: u32 = 75;
pub const DEFAULT_GOAL_WATER_OZ: f64 = 128.0;
/// Ten years; longer windows are rejected when edited and clamped when loaded.
pub const MAX_DURATION_DAYS: u32 = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Upcoming,
    Active,
    Ended,
}

impl WindowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowState::Upcoming => "upcoming",
            WindowState::Active => "active",
            WindowState::Ended => "ended",
        }
    }
}

/// The start/duration span a challenge is tracked over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeWindow {
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub goal_water_oz: f64,
}

impl ChallengeWindow {
    pub fn new(start_date: NaiveDate, duration_days: u32, goal_water_oz: f64) -> Self {
        Self {
            start_date,
            duration_days: duration_days.clamp(1, MAX_DURATION_DAYS),
            goal_water_oz,
        }
    }

    /// Builds a window from user input, rejecting values `new` would
    /// silently clamp.
    pub fn validated(
        start_date: NaiveDate,
        duration_days: u32,
        goal_water_oz: f64,
    ) -> Result<Self> {
        if !(1..=MAX_DURATION_DAYS).contains(&duration_days) {
            bail!("Duration must be between 1 and {} days", MAX_DURATION_DAYS);
        }
        if !goal_water_oz.is_finite() || goal_water_oz <= 0.0 {
            bail!("Water goal must be a positive number of ounces");
        }
        let window = Self::new(start_date, duration_days, goal_water_oz);
        if window.checked_end_date().is_none() {
            bail!("Start date {} is too far out for a {}-day window", start_date, duration_days);
        }
        Ok(window)
    }

    fn checked_end_date(&self) -> Option<NaiveDate> {
        self.start_date
            .checked_add_signed(Duration::days(self.duration_days.max(1) as i64 - 1))
    }

    /// Last day of the window, inclusive. Saturates at the end of the
    /// calendar for windows that would run past it.
    pub fn end_date(&self) -> NaiveDate {
        self.checked_end_date().unwrap_or(NaiveDate::MAX)
    }

    /// 1-indexed day number, clamped to `[1, duration_days]`.
    pub fn current_day_number(&self, date: NaiveDate) -> u32 {
        let offset = (date - self.start_date).num_days() + 1;
        offset.clamp(1, self.duration_days.max(1) as i64) as u32
    }

    pub fn is_within_window(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date()
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.is_within_window(today)
    }

    pub fn state(&self, today: NaiveDate) -> WindowState {
        if today < self.start_date {
            WindowState::Upcoming
        } else if today > self.end_date() {
            WindowState::Ended
        } else {
            WindowState::Active
        }
    }

    /// Days left after `today`, not counting today itself.
    pub fn days_remaining(&self, today: NaiveDate) -> u32 {
        match self.state(today) {
            WindowState::Upcoming => self.duration_days,
            WindowState::Ended => 0,
            WindowState::Active => (self.end_date() - today).num_days() as u32,
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.duration_days as i64)
            .map_while(move |i| self.start_date.checked_add_signed(Duration::days(i)))
    }
}
