use crate::Logger;

#[derive(Default)]
pub struct MultiLogger {
    loggers: Vec<Box<dyn Logger + Send>>,
}

impl Logger for MultiLogger {
    fn log(&mut self, message: &crate::LogMessage) -> bool {
        // Every logger sees the message even if an earlier one has failed.
        self.loggers
            .iter_mut()
            .fold(true, |ok, logger| logger.log(message) && ok)
    }

    fn flush(&mut self) {
        self.loggers.iter_mut().for_each(|logger| logger.flush());
    }
}

impl MultiLogger {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_logger<T: Logger + Send + 'static>(mut self, logger: T) -> Self {
        self.loggers.push(Box::new(logger));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}
