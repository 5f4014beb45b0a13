use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};
use crate::reconciler::{MAX_TRANSFER_WINDOW_DAYS, TRANSFER_WINDOW_DAYS};
use crate::reports::DEFAULT_TOP_N;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_transfer_window_days")]
    pub transfer_window_days: i64,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_transfer_window_days() -> i64 {
    TRANSFER_WINDOW_DAYS
}

fn default_export_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("tally")
        .join("exports")
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            transfer_window_days: default_transfer_window_days(),
            export_dir: default_export_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    fn problem(&self) -> Option<String> {
        if self.top_n == 0 {
            return Some("top_n must be at least 1".to_string());
        }
        if !(0..=MAX_TRANSFER_WINDOW_DAYS).contains(&self.transfer_window_days) {
            return Some(format!(
                "transfer_window_days must be between 0 and {MAX_TRANSFER_WINDOW_DAYS}, got {}",
                self.transfer_window_days
            ));
        }
        None
    }

    /// Reject values the reports cannot run with.
    pub fn validate(&self) -> Result<()> {
        match self.problem() {
            Some(msg) => Err(TallyError::Settings(msg)),
            None => Ok(()),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Read settings from `path`. A missing file yields defaults; a corrupt or out-of-range one is an error.
pub fn read_settings_from(path: &Path) -> Result<Settings> {
    let settings: Settings = match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| TallyError::Settings(format!("{}: {e}", path.display())))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e.into()),
    };
    match settings.problem() {
        Some(msg) => Err(TallyError::Settings(format!("{}: {msg}", path.display()))),
        None => Ok(settings),
    }
}

/// Settings to run with, plus the problem that forced a fallback to defaults, if any.
///
/// The problem is returned rather than logged so the caller can report it once logging is up.
pub fn load_settings_from(path: &Path) -> (Settings, Option<TallyError>) {
    match read_settings_from(path) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    }
}

pub fn load_settings() -> (Settings, Option<TallyError>) {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TallyError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn shellexpand_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}
