use logger::{LogMessage, LogWorker, severity::LogSeverity};

/// Severity shorthands over a [`LogWorker`].
pub(crate) trait LogHelpers {
    fn log_at(&self, severity: LogSeverity, msg: impl Into<String>) -> bool;

    fn log_error(&self, msg: impl Into<String>) -> bool {
        self.log_at(LogSeverity::Error, msg)
    }

    fn log_warn(&self, msg: impl Into<String>) -> bool {
        self.log_at(LogSeverity::Warning, msg)
    }

    fn log_info(&self, msg: impl Into<String>) -> bool {
        self.log_at(LogSeverity::Info, msg)
    }

    fn log_debug(&self, msg: impl Into<String>) -> bool {
        self.log_at(LogSeverity::Debug, msg)
    }

    fn log_verbose(&self, msg: impl Into<String>) -> bool {
        self.log_at(LogSeverity::Verbose, msg)
    }
}

impl LogHelpers for LogWorker {
    fn log_at(&self, severity: LogSeverity, msg: impl Into<String>) -> bool {
        self.log(LogMessage::new(severity, msg))
    }
}
