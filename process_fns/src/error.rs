use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenError {
    #[cfg(windows)]
    #[error("Windows function call failed with error {} : {}", _0.code(), _0.message())]
    WindowsError(#[from] windows::core::Error),
    #[error("An IO error occured. {0}")]
    IO(#[from] std::io::Error),
    #[error("Process {0} does not exist")]
    NoSuchProcess(u32),
}
