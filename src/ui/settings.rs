use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::output::DEFAULT_OUTPUT_DIR;
use crate::capture::IntervalUnit;

/// Application settings remembered between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Frequency field exactly as typed
    pub frequency: String,
    /// Unit the frequency is in
    pub unit: IntervalUnit,
    /// Directory captures are written to
    pub output_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            frequency: "5".to_string(),
            unit: IntervalUnit::Seconds,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl AppSettings {
    /// Get settings file path
    pub fn get_settings_file() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("regionlapse").join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::get_settings_file().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::debug!("Settings saved to {}", path.display());
        Ok(())
    }
}
