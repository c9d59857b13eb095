use crate::notify::template::DEFAULT_MAX_NOTIFICATIONS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Resolve ambiguous dates to the future ("friday" is the next friday).
    pub forward_date: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { forward_date: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub max_notifications: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_notifications: DEFAULT_MAX_NOTIFICATIONS,
        }
    }
}

/// Top-level configuration, read from a JSON file. Missing keys default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub parser: ParserConfig,
    pub notifications: NotificationConfig,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            notifications: NotificationConfig::default(),
            log_level: "info".to_string(),
            log_file: None,
            state_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&raw).context(format!("Failed to parse config file: {:?}", path))
    }

    /// Directory holding saved preferences such as the default template.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("donetick"))
    }
}
