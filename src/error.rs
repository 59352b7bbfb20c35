use process_fns::OpenError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Cannot find a process by name: {name}")]
    NotFound { name: String },
    #[error("Cannot open process {pid}. {source}")]
    OpenFailed {
        pid: u32,
        #[source]
        source: OpenError,
    },
    #[error("Invalid argument. {0}")]
    InvalidArgument(String),
    #[error("Access of {len} byte(s) at index {index} exceeds the {available} captured byte(s)")]
    OutOfBounds {
        index: usize,
        len: usize,
        available: usize,
    },
    #[error("Configuration error. {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("An IO error occured. {0}")]
    IO(#[from] std::io::Error),
    #[error("Failed to parse configuration. {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to set up logging. {0}")]
    Logger(#[from] logger::LoggerError),
}
