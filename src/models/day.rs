use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

pub const MAX_WORKOUTS: u8 = 2;
pub const MAX_WATER_OZ: f64 = 200.0;
pub const COMPLETED_THRESHOLD: f64 = 0.8;
const CATEGORY_COUNT: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habit {
    Read,
    Workouts,
    Water,
    Sleep,
    Supplements,
    Photo,
    Journal,
}

impl Habit {
    pub fn all() -> [Habit; 7] {
        [
            Habit::Read,
            Habit::Workouts,
            Habit::Water,
            Habit::Sleep,
            Habit::Supplements,
            Habit::Photo,
            Habit::Journal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Habit::Read => "read",
            Habit::Workouts => "workouts",
            Habit::Water => "water",
            Habit::Sleep => "sleep",
            Habit::Supplements => "supplements",
            Habit::Photo => "photo",
            Habit::Journal => "journal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Habit::Read => "Read 10 pages",
            Habit::Workouts => "Two workouts",
            Habit::Water => "Drink water",
            Habit::Sleep => "Sleep",
            Habit::Supplements => "Supplements",
            Habit::Photo => "Progress photo",
            Habit::Journal => "Journal",
        }
    }
}

impl std::fmt::Display for Habit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Habit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" | "reading" => Ok(Habit::Read),
            "workout" | "workouts" => Ok(Habit::Workouts),
            "water" => Ok(Habit::Water),
            "sleep" => Ok(Habit::Sleep),
            "supplement" | "supplements" => Ok(Habit::Supplements),
            "photo" => Ok(Habit::Photo),
            "journal" | "journaled" => Ok(Habit::Journal),
            _ => Err(anyhow::anyhow!("Unknown habit: {}", s)),
        }
    }
}

/// What a record is scored against: the water goal and the configured supplements.
#[derive(Debug, Clone, Copy)]
pub struct Scoring<'a> {
    pub goal_water_oz: f64,
    pub supplements: &'a [String],
}

/// One calendar day's habit state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub has_read: bool,
    pub workouts_completed: u8,
    pub water_oz: f64,
    pub has_sleep: bool,
    pub sleep_hours: Option<f64>,
    /// Set once the user enters sleep themselves; imports never override it.
    pub sleep_manual: bool,
    pub supplements_taken: BTreeSet<String>,
    pub has_photo: bool,
    pub photo_thumbnail: Option<Vec<u8>>,
    pub photo_note: Option<String>,
    pub has_journaled: bool,
    pub weight: Option<f64>,
    pub note: Option<String>,
}

impl DayRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            has_read: false,
            workouts_completed: 0,
            water_oz: 0.0,
            has_sleep: false,
            sleep_hours: None,
            sleep_manual: false,
            supplements_taken: BTreeSet::new(),
            has_photo: false,
            photo_thumbnail: None,
            photo_note: None,
            has_journaled: false,
            weight: None,
            note: None,
        }
    }

    pub fn all_supplements_taken(&self, supplements: &[String]) -> bool {
        supplements.iter().all(|s| self.supplements_taken.contains(s))
    }

    pub fn is_habit_done(&self, habit: Habit, scoring: &Scoring) -> bool {
        match habit {
            Habit::Read => self.has_read,
            Habit::Workouts => self.workouts_completed >= MAX_WORKOUTS,
            Habit::Water => self.water_oz >= scoring.goal_water_oz,
            Habit::Sleep => self.has_sleep,
            Habit::Supplements => self.all_supplements_taken(scoring.supplements),
            Habit::Photo => self.has_photo,
            Habit::Journal => self.has_journaled,
        }
    }

    /// Weighted fraction of the seven categories satisfied. Workouts earn half
    /// of their share per workout.
    pub fn completion_percentage(&self, scoring: &Scoring) -> f64 {
        let mut score = (self.workouts_completed as f64 * 0.5).min(1.0);
        for habit in Habit::all() {
            if habit != Habit::Workouts && self.is_habit_done(habit, scoring) {
                score += 1.0;
            }
        }
        (score / CATEGORY_COUNT).clamp(0.0, 1.0)
    }

    pub fn water_progress_percentage(&self, goal_water_oz: f64) -> f64 {
        if goal_water_oz <= 0.0 {
            return 1.0;
        }
        (self.water_oz / goal_water_oz).clamp(0.0, 1.0)
    }

    pub fn photo_locked(&self) -> bool {
        self.has_photo && self.photo_thumbnail.is_some()
    }

    // Mutators return whether anything changed so callers only schedule
    // writes for real edits.

    pub fn toggle_read(&mut self) -> bool {
        self.has_read = !self.has_read;
        true
    }

    pub fn increment_workouts(&mut self) -> bool {
        if self.workouts_completed >= MAX_WORKOUTS {
            return false;
        }
        self.workouts_completed += 1;
        true
    }

    pub fn decrement_workouts(&mut self) -> bool {
        if self.workouts_completed == 0 {
            return false;
        }
        self.workouts_completed -= 1;
        true
    }

    pub fn add_water(&mut self, oz: f64) -> bool {
        self.set_water(self.water_oz + oz)
    }

    pub fn set_water(&mut self, oz: f64) -> bool {
        if !oz.is_finite() {
            return false;
        }
        let clamped = oz.clamp(0.0, MAX_WATER_OZ);
        if clamped == self.water_oz {
            return false;
        }
        self.water_oz = clamped;
        true
    }

    pub fn toggle_sleep(&mut self) -> bool {
        self.has_sleep = !self.has_sleep;
        self.sleep_manual = true;
        true
    }

    pub fn set_sleep_hours(&mut self, hours: f64, goal_hours: f64) -> bool {
        if !hours.is_finite() || hours < 0.0 {
            return false;
        }
        self.sleep_hours = Some(hours);
        self.has_sleep = hours >= goal_hours;
        self.sleep_manual = true;
        true
    }

    /// Applies a sleep value from a health-data source unless the user
    /// already entered sleep for this day.
    pub fn apply_imported_sleep(&mut self, hours: f64, goal_hours: f64) -> bool {
        if self.sleep_manual || !hours.is_finite() || hours < 0.0 {
            return false;
        }
        self.sleep_hours = Some(hours);
        self.has_sleep = hours >= goal_hours;
        true
    }

    pub fn toggle_supplement(&mut self, id: &str) -> bool {
        if !self.supplements_taken.remove(id) {
            self.supplements_taken.insert(id.to_string());
        }
        true
    }

    /// No effect once a photo has been captured for the day.
    pub fn toggle_photo(&mut self) -> bool {
        if self.photo_locked() {
            return false;
        }
        self.has_photo = !self.has_photo;
        true
    }

    pub fn record_photo(&mut self, thumbnail: Vec<u8>, note: Option<String>) -> bool {
        if self.photo_locked() {
            return false;
        }
        self.has_photo = true;
        self.photo_thumbnail = Some(thumbnail);
        self.photo_note = note;
        true
    }

    pub fn reset_photo(&mut self) -> bool {
        if !self.has_photo && self.photo_thumbnail.is_none() && self.photo_note.is_none() {
            return false;
        }
        self.has_photo = false;
        self.photo_thumbnail = None;
        self.photo_note = None;
        true
    }

    pub fn toggle_journal(&mut self) -> bool {
        self.has_journaled = !self.has_journaled;
        true
    }

    pub fn mark_journaled(&mut self) -> bool {
        if self.has_journaled {
            return false;
        }
        self.has_journaled = true;
        true
    }

    pub fn set_weight(&mut self, weight: Option<f64>) -> bool {
        if self.weight == weight {
            return false;
        }
        self.weight = weight;
        true
    }

    pub fn set_note(&mut self, note: Option<String>) -> bool {
        let note = note.filter(|n| !n.trim().is_empty());
        if self.note == note {
            return false;
        }
        self.note = note;
        true
    }

    /// Checklist toggle used by the dashboard and `check` command. Water and
    /// workouts are quantities, so checking them fills them to the goal.
    pub fn toggle_habit(&mut self, habit: Habit, scoring: &Scoring) -> bool {
        match habit {
            Habit::Read => self.toggle_read(),
            Habit::Workouts => {
                if self.workouts_completed >= MAX_WORKOUTS {
                    self.workouts_completed = 0;
                    true
                } else {
                    self.increment_workouts()
                }
            }
            Habit::Water => {
                if self.water_oz >= scoring.goal_water_oz {
                    self.set_water(0.0)
                } else {
                    self.set_water(scoring.goal_water_oz)
                }
            }
            Habit::Sleep => self.toggle_sleep(),
            Habit::Supplements => {
                if self.all_supplements_taken(scoring.supplements) {
                    if self.supplements_taken.is_empty() {
                        return false;
                    }
                    self.supplements_taken.clear();
                } else {
                    self.supplements_taken
                        .extend(scoring.supplements.iter().cloned());
                }
                true
            }
            Habit::Photo => self.toggle_photo(),
            Habit::Journal => self.toggle_journal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Missed,
    Upcoming,
}

impl DayStatus {
    /// Absent records count as missed once their date has arrived.
    pub fn classify(
        date: NaiveDate,
        record: Option<&DayRecord>,
        today: NaiveDate,
        scoring: &Scoring,
    ) -> DayStatus {
        if date > today {
            return DayStatus::Upcoming;
        }
        match record {
            Some(r) if r.completion_percentage(scoring) >= COMPLETED_THRESHOLD => {
                DayStatus::Completed
            }
            _ => DayStatus::Missed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Completed => "completed",
            DayStatus::Missed => "missed",
            DayStatus::Upcoming => "upcoming",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn full_day(supplements: &[String]) -> DayRecord {
        let mut r = DayRecord::new(date());
        r.has_read = true;
        r.workouts_completed = 2;
        r.water_oz = 128.0;
        r.has_sleep = true;
        r.supplements_taken = supplements.iter().cloned().collect();
        r.has_photo = true;
        r.has_journaled = true;
        r
    }

    #[test]
    fn workouts_earn_partial_credit() {
        let scoring = Scoring { goal_water_oz: 128.0, supplements: &[] };
        let supplements = ["creatine".to_string()];
        let strict = Scoring { goal_water_oz: 128.0, supplements: &supplements };
        let mut r = DayRecord::new(date());
        for (count, share) in [(0u8, 0.0), (1, 0.5), (2, 1.0)] {
            r.workouts_completed = count;
            let expected = share / 7.0;
            assert!((r.completion_percentage(&strict) - expected).abs() < EPS);
            assert!((r.completion_percentage(&scoring) - (expected + 1.0 / 7.0)).abs() < EPS);
        }
    }

    #[test]
    fn complete_day_scores_one() {
        let supplements = vec!["multi".to_string(), "fish oil".to_string()];
        let scoring = Scoring { goal_water_oz: 128.0, supplements: &supplements };
        let r = full_day(&supplements);
        assert!((r.completion_percentage(&scoring) - 1.0).abs() < EPS);
    }

    #[test]
    fn empty_day_scores_zero_unless_supplements_are_vacuous() {
        let supplements = vec!["multi".to_string()];
        let strict = Scoring { goal_water_oz: 128.0, supplements: &supplements };
        let vacuous = Scoring { goal_water_oz: 128.0, supplements: &[] };
        let r = DayRecord::new(date());
        assert_eq!(r.completion_percentage(&strict), 0.0);
        assert!((r.completion_percentage(&vacuous) - 1.0 / 7.0).abs() < EPS);
    }

    #[test]
    fn partial_supplements_do_not_count() {
        let supplements = vec!["multi".to_string(), "zinc".to_string()];
        let scoring = Scoring { goal_water_oz: 128.0, supplements: &supplements };
        let mut r = DayRecord::new(date());
        r.toggle_supplement("multi");
        assert!(!r.is_habit_done(Habit::Supplements, &scoring));
        r.toggle_supplement("zinc");
        assert!(r.is_habit_done(Habit::Supplements, &scoring));
        r.toggle_supplement("zinc");
        assert!(!r.is_habit_done(Habit::Supplements, &scoring));
    }

    #[test]
    fn water_progress_caps_at_one() {
        let mut r = DayRecord::new(date());
        assert_eq!(r.water_progress_percentage(128.0), 0.0);
        r.water_oz = 128.0;
        assert_eq!(r.water_progress_percentage(128.0), 1.0);
        r.water_oz = 200.0;
        assert_eq!(r.water_progress_percentage(100.0), 1.0);
    }

    #[test]
    fn mutators_stop_at_bounds() {
        let mut r = DayRecord::new(date());
        assert!(r.increment_workouts());
        assert!(r.increment_workouts());
        assert!(!r.increment_workouts());
        assert_eq!(r.workouts_completed, 2);

        assert!(r.add_water(150.0));
        assert!(r.add_water(150.0));
        assert_eq!(r.water_oz, 200.0);
        assert!(!r.add_water(8.0));
        assert!(r.add_water(-500.0));
        assert_eq!(r.water_oz, 0.0);
    }

    #[test]
    fn photo_lock_blocks_toggle() {
        let mut r = DayRecord::new(date());
        assert!(r.record_photo(vec![0xff, 0xd8], Some("front".into())));
        assert!(r.has_photo);
        assert!(!r.toggle_photo());
        assert!(r.has_photo);
        assert!(!r.record_photo(vec![1], None));

        assert!(r.reset_photo());
        assert!(r.toggle_photo());
        assert!(r.has_photo);
        // No photo data yet, so the flag can still be cleared.
        assert!(r.toggle_photo());
        assert!(!r.has_photo);
    }

    #[test]
    fn imported_sleep_never_overrides_manual_entry() {
        let mut r = DayRecord::new(date());
        assert!(r.apply_imported_sleep(7.5, 7.0));
        assert!(r.has_sleep);
        assert_eq!(r.sleep_hours, Some(7.5));

        assert!(r.set_sleep_hours(5.0, 7.0));
        assert!(!r.has_sleep);
        assert!(!r.apply_imported_sleep(9.0, 7.0));
        assert_eq!(r.sleep_hours, Some(5.0));
    }

    #[test]
    fn classify_uses_threshold_and_today() {
        let scoring = Scoring { goal_water_oz: 128.0, supplements: &[] };
        let today = date();
        let mut r = DayRecord::new(today);
        assert_eq!(DayStatus::classify(today, Some(&r), today, &scoring), DayStatus::Missed);
        assert_eq!(DayStatus::classify(today, None, today, &scoring), DayStatus::Missed);

        // 5 of 7 categories (with vacuous supplements) is below 0.8.
        r.has_read = true;
        r.has_sleep = true;
        r.has_photo = true;
        r.has_journaled = true;
        assert_eq!(DayStatus::classify(today, Some(&r), today, &scoring), DayStatus::Missed);
        r.water_oz = 128.0;
        assert_eq!(DayStatus::classify(today, Some(&r), today, &scoring), DayStatus::Completed);

        let tomorrow = today.succ_opt().unwrap();
        assert_eq!(
            DayStatus::classify(tomorrow, Some(&r), today, &scoring),
            DayStatus::Upcoming
        );
    }

    #[test]
    fn serde_round_trip_preserves_fields() {
        let supplements = vec!["multi".to_string()];
        let mut r = full_day(&supplements);
        r.weight = Some(181.4);
        r.note = Some("felt strong".into());
        r.photo_thumbnail = Some(vec![1, 2, 3]);
        let json = serde_json::to_string(&r).unwrap();
        let back: DayRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn habit_parses_aliases() {
        assert_eq!("Reading".parse::<Habit>().unwrap(), Habit::Read);
        assert_eq!("workout".parse::<Habit>().unwrap(), Habit::Workouts);
        assert!("nap".parse::<Habit>().is_err());
    }
}
