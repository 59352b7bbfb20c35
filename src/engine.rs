use logger::{LogManager, LogWorker};
use num_format::{Locale, ToFormattedString};
use process_fns::RegionSource;

#[cfg(any(windows, target_os = "linux"))]
use process_fns::{ProcessHandle, process::find_process_id};

use crate::{
    config::FinderConfig,
    error::FinderError,
    logging::LogHelpers,
    pattern::Pattern,
    snapshot::{MemorySnapshot, ScanFlow, ScanOutcome},
    traverse::Regions,
};

const LOCALE: &Locale = &Locale::en;

/// Which process to open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessTarget {
    /// Matched case-insensitively against the start of the executable name
    Name(String),
    Pid(u32),
}

impl From<&str> for ProcessTarget {
    fn from(name: &str) -> Self {
        ProcessTarget::Name(name.to_string())
    }
}

impl From<String> for ProcessTarget {
    fn from(name: String) -> Self {
        ProcessTarget::Name(name)
    }
}

impl From<u32> for ProcessTarget {
    fn from(pid: u32) -> Self {
        ProcessTarget::Pid(pid)
    }
}

/// Scans the address space of one process.
///
/// The finder owns its [`RegionSource`]; for a live process that is the OS handle, which is
/// released when the finder is dropped. No snapshot outlives the call that produced it unless
/// a callback clones it.
pub struct MemoryFinder<S: RegionSource = DefaultSource> {
    source: S,
    pid: Option<u32>,
    config: FinderConfig,
    log: LogWorker,
    // Keeps a configured sink alive and flushes it on drop.
    _log_manager: Option<LogManager>,
}

#[cfg(any(windows, target_os = "linux"))]
pub type DefaultSource = ProcessHandle;
#[cfg(not(any(windows, target_os = "linux")))]
pub type DefaultSource = Box<dyn RegionSource>;

#[cfg(any(windows, target_os = "linux"))]
impl MemoryFinder<ProcessHandle> {
    pub fn open(target: impl Into<ProcessTarget>, config: FinderConfig) -> Result<Self, FinderError> {
        let log_manager = config.build_log_manager()?;
        let pid = match target.into() {
            ProcessTarget::Pid(pid) => pid,
            ProcessTarget::Name(name) => match find_process_id(&name) {
                Some(pid) => pid,
                None => {
                    log_manager.log_error(format!("Cannot find a process named {}", name));
                    return Err(FinderError::NotFound { name });
                }
            },
        };
        let handle = ProcessHandle::open(pid).map_err(|source| {
            log_manager.log_error(format!("Cannot open process {}: {}", pid, source));
            FinderError::OpenFailed { pid, source }
        })?;
        log_manager.log_info(format!("Opened process {}", pid));

        let log = log_manager.get_log_worker();
        Ok(Self {
            source: handle,
            pid: Some(pid),
            config,
            log,
            _log_manager: Some(log_manager),
        })
    }

    pub fn from_name(name: &str) -> Result<Self, FinderError> {
        Self::open(name, FinderConfig::default())
    }

    pub fn from_pid(pid: u32) -> Result<Self, FinderError> {
        Self::open(pid, FinderConfig::default())
    }
}

impl<S: RegionSource> MemoryFinder<S> {
    /// Builds a finder over any region source, logging through `log`.
    pub fn with_source(source: S, config: FinderConfig, log: LogWorker) -> Self {
        Self {
            source,
            pid: None,
            config,
            log,
            _log_manager: None,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Reads up to `size` bytes at `address`; the result is shorter if the read was truncated.
    pub fn read(&self, address: u64, size: usize) -> Vec<u8> {
        self.source.read(address, size)
    }

    pub fn read_default(&self, address: u64) -> Vec<u8> {
        self.read(address, self.config.default_read_size)
    }

    /// Starts a new walk over the address space from address zero.
    pub fn traverse(&self) -> Regions<'_, S> {
        self.log.log_debug("Beginning memory walk...");
        Regions::new(&self.source, &self.log, self.config.include_image_regions)
    }

    /// Calls `predicate` at every captured byte of every region, in address order, until it
    /// returns [`ScanFlow::Stop`].
    pub fn scan<F>(&self, mut predicate: F) -> ScanOutcome
    where
        F: FnMut(&MemorySnapshot) -> ScanFlow,
    {
        for mut snapshot in self.traverse() {
            if snapshot.scan_all(&mut predicate).is_stopped() {
                return ScanOutcome::Stopped;
            }
        }
        ScanOutcome::Exhausted
    }

    /// Like [`scan`](Self::scan), but the first error returned by `predicate` ends the walk.
    pub fn try_scan<F, E>(&self, mut predicate: F) -> Result<ScanOutcome, E>
    where
        F: FnMut(&MemorySnapshot) -> Result<ScanFlow, E>,
    {
        for mut snapshot in self.traverse() {
            if snapshot.try_scan_all(&mut predicate)?.is_stopped() {
                return Ok(ScanOutcome::Stopped);
            }
        }
        Ok(ScanOutcome::Exhausted)
    }

    /// Calls `on_found` with the cursor on each occurrence of `pattern`, in address order.
    pub fn find<P, F>(&self, pattern: P, mut on_found: F) -> Result<ScanOutcome, FinderError>
    where
        P: Into<Pattern>,
        F: FnMut(&MemorySnapshot) -> ScanFlow,
    {
        let pattern = pattern.into();
        let needle = pattern.to_bytes()?;
        let mut matches = 0_usize;
        let outcome = self.scan(|snapshot| {
            if !snapshot.matches_at(&needle, 0) {
                return ScanFlow::Continue;
            }
            matches += 1;
            self.log
                .log_debug(format!("Matched at {:#x} in {}", snapshot.address(), snapshot));
            on_found(snapshot)
        });
        self.log.log_debug(format!(
            "Finished search for {:?}: {} match(es), {:?}",
            pattern, matches, outcome
        ));
        Ok(outcome)
    }

    /// Address of the first occurrence of `pattern`.
    pub fn find_first(&self, pattern: impl Into<Pattern>) -> Result<Option<u64>, FinderError> {
        let mut found = None;
        self.find(pattern, |snapshot| {
            found = Some(snapshot.address());
            ScanFlow::Stop
        })?;
        Ok(found)
    }

    /// Addresses of every occurrence of `pattern`.
    pub fn find_all(&self, pattern: impl Into<Pattern>) -> Result<Vec<u64>, FinderError> {
        let mut found = Vec::new();
        self.find(pattern, |snapshot| {
            found.push(snapshot.address());
            ScanFlow::Continue
        })?;
        Ok(found)
    }

    /// Total captured bytes over a fresh traversal. A rough size for progress reporting, not the
    /// process's real memory usage.
    pub fn total_committed_size(&self) -> u64 {
        let total = self
            .traverse()
            .map(|snapshot| snapshot.base_size() as u64)
            .sum::<u64>();
        self.log.log_info(format!(
            "Committed size: {} bytes",
            total.to_formatted_string(LOCALE)
        ));
        total
    }
}
