use crate::Logger;

/// Writes messages to stderr so stdout stays free for scan results.
#[derive(Default)]
pub struct ConsoleLogger {}

impl Logger for ConsoleLogger {
    fn log(&mut self, message: &crate::LogMessage) -> bool {
        eprintln!("({}) {} : {}", message.time.format("%H:%M:%S%.3f"), message.severity, message.content);
        true
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Default::default()
    }
}
