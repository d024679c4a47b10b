//! Platform services the app talks to. Each is a trait constructed at the
//! application root and passed in where needed.

pub mod health;
pub mod notifications;

pub use health::{ManualSleepSource, SleepSource};
pub use notifications::{ConsoleScheduler, ReminderScheduler};
