pub mod challenge;
pub mod day;
pub mod journal;
pub mod navigator;
pub mod progress;
pub mod reminder;

pub use challenge::{ChallengeWindow, WindowState};
pub use day::{DayRecord, DayStatus, Habit, Scoring};
pub use journal::JournalEntry;
pub use navigator::{DayNavigator, Direction};
pub use progress::{ProgressAggregator, ProgressSummary};
pub use reminder::Reminder;
