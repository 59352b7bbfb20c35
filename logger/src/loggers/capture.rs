use std::sync::{Arc, Mutex};

use crate::{LogMessage, Logger};

/// Keeps every message in memory. Clones share the same storage, so a clone can be handed to a
/// [`LogManager`](crate::LogManager) while the original is used to inspect what was logged.
#[derive(Clone, Default)]
pub struct CaptureLogger {
    messages: Arc<Mutex<Vec<LogMessage>>>,
}

impl Logger for CaptureLogger {
    fn log(&mut self, message: &LogMessage) -> bool {
        self.messages
            .lock()
            .map(|mut messages| messages.push(message.clone()))
            .is_ok()
    }
}

impl CaptureLogger {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn contents(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .map(|message| message.content)
            .collect()
    }
}
