//! Enumerate the memory regions of a running process, capture them, and search the copies for
//! byte patterns.
//!
//! ```no_run
//! use memfinder::{MemoryFinder, ScanFlow};
//!
//! let finder = MemoryFinder::from_name("notepad.exe")?;
//! finder.find("needle", |snapshot| {
//!     println!("{} {:?}", snapshot.hex_address(), snapshot.printable_run(0, 32));
//!     ScanFlow::Continue
//! })?;
//! # Ok::<(), memfinder::FinderError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod snapshot;
pub mod traverse;

mod logging;
#[cfg(test)]
mod testing;

pub use config::FinderConfig;
pub use engine::{MemoryFinder, ProcessTarget};
pub use error::{ConfigError, FinderError};
pub use pattern::Pattern;
pub use snapshot::{MemorySnapshot, ScanFlow, ScanOutcome};
pub use traverse::Regions;

pub use process_fns::{BackingType, RegionDescriptor, RegionSource, RegionState};
pub use logger;
