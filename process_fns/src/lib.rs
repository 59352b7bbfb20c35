pub mod process;
pub mod region;

mod error;

pub use error::OpenError;
pub use region::{BackingType, RegionDescriptor, RegionState};

#[cfg(any(windows, target_os = "linux"))]
pub use process::ProcessHandle;

/// Access to the address space of one process.
///
/// Implemented by [`ProcessHandle`] for live processes. Anything else that can answer region
/// queries and serve reads (a captured dump, a test fixture) can implement it too.
pub trait RegionSource {
    /// Returns the region containing `address`, or the next region above it.
    /// `None` signals the end of the address space.
    fn query(&self, address: u64) -> Option<RegionDescriptor>;

    /// Reads up to `len` bytes at `address`. A short (or empty) result is not an error.
    fn read(&self, address: u64, len: usize) -> Vec<u8>;
}

impl<S: RegionSource + ?Sized> RegionSource for &S {
    fn query(&self, address: u64) -> Option<RegionDescriptor> {
        (**self).query(address)
    }

    fn read(&self, address: u64, len: usize) -> Vec<u8> {
        (**self).read(address, len)
    }
}

impl<S: RegionSource + ?Sized> RegionSource for Box<S> {
    fn query(&self, address: u64) -> Option<RegionDescriptor> {
        (**self).query(address)
    }

    fn read(&self, address: u64, len: usize) -> Vec<u8> {
        (**self).read(address, len)
    }
}
