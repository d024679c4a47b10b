use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::challenge::{DEFAULT_DURATION_DAYS, DEFAULT_GOAL_WATER_OZ};

fn default_duration_days() -> u32 {
    DEFAULT_DURATION_DAYS
}
fn default_goal_water_oz() -> f64 {
    DEFAULT_GOAL_WATER_OZ
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_sleep_goal_hours() -> f64 {
    7.0
}
fn default_true() -> bool {
    true
}
fn default_reminder_entries() -> Vec<ReminderEntry> {
    [
        ("07:00", "Start strong: read your 10 pages"),
        ("12:00", "Water check: are you halfway to your gallon?"),
        ("18:00", "Second workout still to do? Get outside."),
        ("21:00", "Progress photo and journal before bed"),
    ]
    .into_iter()
    .map(|(time, message)| ReminderEntry {
        time: time.to_string(),
        message: message.to_string(),
    })
    .collect()
}

/// Used when the first challenge window is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeConfig {
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    #[serde(default = "default_goal_water_oz")]
    pub goal_water_oz: f64,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            duration_days: default_duration_days(),
            goal_water_oz: default_goal_water_oz(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReminderEntry {
    pub time: String, // "HH:MM", local time
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_reminder_entries")]
    pub entries: Vec<ReminderEntry>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            entries: default_reminder_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Quiet period before a burst of edits to one day is written.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepConfig {
    #[serde(default = "default_sleep_goal_hours")]
    pub goal_hours: f64,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            goal_hours: default_sleep_goal_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Empty means the supplements habit is satisfied automatically.
    #[serde(default)]
    pub supplements: Vec<String>,
    #[serde(default)]
    pub challenge: ChallengeConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub sleep: SleepConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "hardline")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("hardline.db"))
    }

    /// Loads the user's config, writing out the defaults on first run so
    /// there is a file to edit.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
            log::info!("wrote default config to {:?}", path);
            return Ok(config);
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
