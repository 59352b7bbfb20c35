use std::path::{Path, PathBuf};

use logger::{
    LogManager,
    loggers::{
        console::ConsoleLogger,
        file::{FileConflictBehavior, FileLogger},
        filter::LogFilter,
        multi::MultiLogger,
        null::NullLogger,
    },
    severity::LogSeverity,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_READ_SIZE: usize = 1024;

/// Engine settings, loadable from JSON. Missing fields take their defaults.
///
/// ```json
/// { "log_level": "debug", "console_log": true, "default_read_size": 4096 }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct FinderConfig {
    pub log_level: LogSeverity,
    pub log_file: Option<PathBuf>,
    pub log_file_behavior: FileConflictBehavior,
    pub console_log: bool,
    /// Also traverse regions mapped from executable images
    pub include_image_regions: bool,
    /// Length used by [`MemoryFinder::read_default`](crate::MemoryFinder::read_default)
    pub default_read_size: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            log_level: LogSeverity::Info,
            log_file: None,
            log_file_behavior: FileConflictBehavior::default(),
            console_log: false,
            include_image_regions: false,
            default_read_size: DEFAULT_READ_SIZE,
        }
    }
}

impl FinderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the log sink described by this configuration. Without a console or file target,
    /// everything is discarded.
    pub fn build_log_manager(&self) -> Result<LogManager, ConfigError> {
        let mut targets = MultiLogger::new();
        if self.console_log {
            targets = targets.with_logger(ConsoleLogger::new());
        }
        if let Some(path) = &self.log_file {
            targets = targets.with_logger(FileLogger::new(path, self.log_file_behavior)?);
        }
        if targets.is_empty() {
            Ok(LogManager::new(NullLogger::new()))
        } else {
            Ok(LogManager::new(LogFilter::new(self.log_level, targets)))
        }
    }
}
