use std::{
    ops::Deref,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Local, TimeDelta};
use serde::{Deserialize, Serialize};
use severity::LogSeverity;
use thiserror::Error;

pub mod loggers;
pub mod severity;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Unknown log severity '{0}'")]
    UnknownSeverity(String),
    #[error("An IO error occured. {0}")]
    IO(#[from] std::io::Error),
}

pub trait Logger {
    /// Returns false once the logger can no longer accept messages.
    fn log(&mut self, message: &LogMessage) -> bool;

    fn flush(&mut self) {}
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LogMessage {
    pub time: DateTime<Local>,
    pub severity: LogSeverity,
    pub content: String,
}

impl LogMessage {
    pub fn new(severity: LogSeverity, content: impl Into<String>) -> Self {
        let content = content.into();
        LogMessage { time: Local::now(), severity, content }
    }
}

type SharedSink = Arc<Mutex<Box<dyn Logger + Send>>>;

/// Owns the log sink. Messages are written on the calling thread.
///
/// Dropping the manager flushes the sink; workers handed out earlier keep writing to it.
pub struct LogManager {
    default_worker: LogWorker,
}

impl Drop for LogManager {
    fn drop(&mut self) {
        self.default_worker.flush();
    }
}

impl LogManager {
    pub fn new<F>(logger: F) -> Self
    where
        F: Logger,
        F: Send + 'static,
    {
        let sink: SharedSink = Arc::new(Mutex::new(Box::new(logger)));
        Self {
            default_worker: LogWorker::new(sink, Local::now()),
        }
    }

    pub fn get_log_worker(&self) -> LogWorker {
        self.default_worker.clone()
    }
}

impl Deref for LogManager {
    type Target = LogWorker;

    fn deref(&self) -> &Self::Target {
        &self.default_worker
    }
}

#[derive(Clone)]
pub struct LogWorker {
    sink: SharedSink,
    manager_start_time: DateTime<Local>,
}

impl LogWorker {
    fn new(sink: SharedSink, manager_start_time: DateTime<Local>) -> Self {
        Self {
            sink,
            manager_start_time,
        }
    }

    /// A worker that discards everything.
    pub fn null() -> Self {
        LogManager::new(loggers::null::NullLogger::new()).get_log_worker()
    }

    pub fn log(&self, message: LogMessage) -> bool {
        self.sink
            .lock()
            .map(|mut sink| sink.log(&message))
            .unwrap_or(false)
    }

    pub fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            sink.flush();
        }
    }

    pub fn time_since_start(&self) -> TimeDelta {
        Local::now().signed_duration_since(self.manager_start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loggers::{capture::CaptureLogger, filter::LogFilter};

    #[test]
    fn workers_share_one_sink() {
        let capture = CaptureLogger::new();
        let manager = LogManager::new(capture.clone());
        let worker = manager.get_log_worker();

        assert!(manager.log(LogMessage::new(LogSeverity::Info, "from manager")));
        assert!(worker.log(LogMessage::new(LogSeverity::Error, "from worker")));

        let contents = capture.contents();
        assert_eq!(contents, vec!["from manager".to_string(), "from worker".to_string()]);
    }

    #[test]
    fn filter_drops_quieter_messages() {
        let capture = CaptureLogger::new();
        let manager = LogManager::new(LogFilter::new(LogSeverity::Info, capture.clone()));

        manager.log(LogMessage::new(LogSeverity::Verbose, "noise"));
        manager.log(LogMessage::new(LogSeverity::Warning, "kept"));

        assert_eq!(capture.contents(), vec!["kept".to_string()]);
    }

    #[test]
    fn elapsed_time_is_not_negative() {
        let worker = LogWorker::null();
        assert!(worker.time_since_start() >= TimeDelta::zero());
    }
}
