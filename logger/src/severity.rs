use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::LoggerError;

/// Ordered from most to least important, so `severity <= threshold` selects what to keep.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Error,
    Warning,
    Info,
    Debug,
    Verbose,
}

impl Display for LogSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sev = match self {
            LogSeverity::Error => "Error",
            LogSeverity::Warning => "Warn",
            LogSeverity::Info => "Info",
            LogSeverity::Debug => "Debug",
            LogSeverity::Verbose => "Verbose",
        };
        f.pad(sev)
    }
}

impl FromStr for LogSeverity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogSeverity::Error),
            "warn" | "warning" => Ok(LogSeverity::Warning),
            "info" => Ok(LogSeverity::Info),
            "debug" => Ok(LogSeverity::Debug),
            "verbose" | "trace" => Ok(LogSeverity::Verbose),
            _ => Err(LoggerError::UnknownSeverity(s.to_string())),
        }
    }
}
