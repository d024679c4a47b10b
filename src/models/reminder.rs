use anyhow::{anyhow, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::ReminderConfig;

/// A (time-of-day, recurring, message) triple handed to a scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub time: NaiveTime,
    pub recurring: bool,
    pub message: String,
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|e| anyhow!("Bad time '{}': {}", s, e))
}

impl Reminder {
    /// Daily reminders from config, sorted by time. Empty when disabled.
    pub fn from_config(config: &ReminderConfig) -> Result<Vec<Reminder>> {
        if !config.enabled {
            return Ok(Vec::new());
        }
        let mut reminders = config
            .entries
            .iter()
            .map(|entry| {
                Ok(Reminder {
                    time: parse_time(&entry.time)?,
                    recurring: true,
                    message: entry.message.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        reminders.sort_by_key(|r| r.time);
        Ok(reminders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ReminderEntry;

    #[test]
    fn parses_and_sorts_entries() {
        let config = ReminderConfig {
            enabled: true,
            entries: vec![
                ReminderEntry { time: "21:00".into(), message: "Journal".into() },
                ReminderEntry { time: "07:30".into(), message: "Read".into() },
            ],
        };
        let reminders = Reminder::from_config(&config).unwrap();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].message, "Read");
        assert_eq!(reminders[0].time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert!(reminders.iter().all(|r| r.recurring));
    }

    #[test]
    fn disabled_config_yields_nothing_and_bad_time_errors() {
        let mut config = ReminderConfig::default();
        config.enabled = false;
        assert!(Reminder::from_config(&config).unwrap().is_empty());

        let bad = ReminderConfig {
            enabled: true,
            entries: vec![ReminderEntry { time: "25:99".into(), message: "x".into() }],
        };
        assert!(Reminder::from_config(&bad).is_err());
    }
}
