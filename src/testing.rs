//! In-memory stand-in for a process, used by unit tests.

use std::cell::Cell;

use process_fns::{BackingType, RegionDescriptor, RegionSource, RegionState};

struct FakeRegion {
    descriptor: RegionDescriptor,
    data: Vec<u8>,
    readable: usize,
}

#[derive(Default)]
pub struct FakeProcess {
    regions: Vec<FakeRegion>,
    queries: Cell<usize>,
}

impl FakeProcess {
    pub fn new() -> Self {
        Default::default()
    }

    fn push(mut self, descriptor: RegionDescriptor, data: Vec<u8>, readable: usize) -> Self {
        self.regions.push(FakeRegion {
            descriptor,
            data,
            readable,
        });
        self.regions.sort_by_key(|r| r.descriptor.base_address);
        self
    }

    pub fn with_region(self, base: u64, data: &[u8], state: RegionState, backing: BackingType) -> Self {
        let descriptor = RegionDescriptor::new(base, data.len() as u64, state, backing);
        self.push(descriptor, data.to_vec(), data.len())
    }

    pub fn with_private(self, base: u64, data: &[u8]) -> Self {
        self.with_region(base, data, RegionState::Committed, BackingType::Private)
    }

    pub fn with_truncated_region(self, base: u64, data: &[u8], readable: usize) -> Self {
        let descriptor = RegionDescriptor::new(
            base,
            data.len() as u64,
            RegionState::Committed,
            BackingType::Private,
        );
        self.push(descriptor, data.to_vec(), readable)
    }

    pub fn with_unreadable_region(self, base: u64, size: u64) -> Self {
        let descriptor = RegionDescriptor::new(base, size, RegionState::Committed, BackingType::Private);
        self.push(descriptor, Vec::new(), 0)
    }

    pub fn with_descriptor(self, descriptor: RegionDescriptor) -> Self {
        self.push(descriptor, Vec::new(), 0)
    }

    pub fn query_count(&self) -> usize {
        self.queries.get()
    }
}

impl RegionSource for FakeProcess {
    fn query(&self, address: u64) -> Option<RegionDescriptor> {
        self.queries.set(self.queries.get() + 1);
        self.regions
            .iter()
            .map(|r| r.descriptor)
            .find(|d| d.base_address >= address || d.end_address().is_none_or(|end| end > address))
    }

    fn read(&self, address: u64, len: usize) -> Vec<u8> {
        self.regions
            .iter()
            .find(|r| {
                r.descriptor.base_address <= address
                    && address - r.descriptor.base_address < r.readable as u64
            })
            .map(|r| {
                let start = (address - r.descriptor.base_address) as usize;
                let end = r.readable.min(start.saturating_add(len));
                r.data[start..end].to_vec()
            })
            .unwrap_or_default()
    }
}
