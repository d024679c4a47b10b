pub mod settings;

pub use settings::{AppConfig, ChallengeConfig, ReminderConfig};
