use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{LogMessage, Logger, LoggerError};

/// What to do when the log file already exists.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileConflictBehavior {
    /// Write to `<stem>_<n>.<ext>` with the first free `n`
    AppendNumber,
    #[default]
    Append,
    Error,
    Overwrite,
}

pub struct FileLogger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Logger for FileLogger {
    fn log(&mut self, message: &LogMessage) -> bool {
        writeln!(
            self.writer,
            "({}) | {:<7} : {}",
            message.time.format("%Y-%b-%d %H:%M:%S"),
            message.severity,
            message.content
        )
        .is_ok()
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

fn numbered_path(file: &Path, counter: usize) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut numbered = file.with_file_name(format!("{}_{}", stem, counter));
    if let Some(extension) = file.extension() {
        numbered.set_extension(extension);
    }
    numbered
}

impl FileLogger {
    pub fn new(file: impl Into<PathBuf>, behavior: FileConflictBehavior) -> Result<Self, LoggerError> {
        let file = file.into();
        let (path, handle) = if file.try_exists()? {
            match behavior {
                FileConflictBehavior::AppendNumber => {
                    let mut counter = 1;
                    let mut new_file = numbered_path(&file, counter);
                    while new_file.try_exists()? {
                        counter += 1;
                        new_file = numbered_path(&file, counter);
                    }
                    let handle = File::create(&new_file)?;
                    (new_file, handle)
                }
                FileConflictBehavior::Append => {
                    let handle = File::options().append(true).open(&file)?;
                    (file, handle)
                }
                FileConflictBehavior::Error => {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "File already exists",
                    )
                    .into());
                }
                FileConflictBehavior::Overwrite => {
                    let handle = File::create(&file)?;
                    (file, handle)
                }
            }
        } else {
            let handle = File::create(&file)?;
            (file, handle)
        };
        Ok(Self {
            path,
            writer: BufWriter::new(handle),
        })
    }

    /// The file actually written to, which differs from the requested one under
    /// [`FileConflictBehavior::AppendNumber`].
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::LogSeverity;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("logger-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = scratch_dir("append");
        let path = dir.join("scan.log");
        std::fs::write(&path, "first line\n").unwrap();

        let mut logger = FileLogger::new(&path, FileConflictBehavior::Append).unwrap();
        assert!(logger.log(&LogMessage::new(LogSeverity::Info, "second line")));
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("first line\n"));
        assert!(content.contains("second line"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn numbers_conflicting_file() {
        let dir = scratch_dir("number");
        let path = dir.join("scan.log");
        std::fs::write(&path, "").unwrap();

        let logger = FileLogger::new(&path, FileConflictBehavior::AppendNumber).unwrap();
        assert_eq!(logger.path(), dir.join("scan_1.log"));
        drop(logger);

        assert!(FileLogger::new(&path, FileConflictBehavior::Error).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
