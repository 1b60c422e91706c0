use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::range::TimeRange;

/// Title of the demo task created on first run
pub const DEFAULT_SEED_TITLE: &str = "My first task";

/// User configuration from config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the data file. Absent = platform data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Range shown by `habit stats` without `--range`
    #[serde(default)]
    pub default_range: TimeRange,
    /// Create a demo task when there is no prior data
    #[serde(default = "default_true")]
    pub seed: bool,
    #[serde(default = "default_seed_title")]
    pub seed_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            default_range: TimeRange::default(),
            seed: true,
            seed_title: default_seed_title(),
        }
    }
}

impl Config {
    /// Title of the task to seed a fresh store with, if seeding is on
    pub fn seed_task(&self) -> Option<&str> {
        if self.seed && !self.seed_title.trim().is_empty() {
            Some(self.seed_title.trim())
        } else {
            None
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_seed_title() -> String {
    DEFAULT_SEED_TITLE.to_string()
}
