use chrono::NaiveDate;

/// Supplies sleep hours for a date, when known.
pub trait SleepSource {
    fn sleep_hours(&self, date: NaiveDate) -> Option<f64>;
}

/// Sleep hours handed in from outside (command line, another app's export).
pub struct ManualSleepSource {
    date: NaiveDate,
    hours: f64,
}

impl ManualSleepSource {
    pub fn new(date: NaiveDate, hours: f64) -> Self {
        Self { date, hours }
    }
}

impl SleepSource for ManualSleepSource {
    fn sleep_hours(&self, date: NaiveDate) -> Option<f64> {
        (date == self.date && self.hours.is_finite() && self.hours >= 0.0).then_some(self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_answers_for_its_date() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();
        let source = ManualSleepSource::new(date, 7.5);
        assert_eq!(source.sleep_hours(date), Some(7.5));
        assert_eq!(source.sleep_hours(date.succ_opt().unwrap()), None);
        assert_eq!(ManualSleepSource::new(date, -1.0).sleep_hours(date), None);
    }
}
