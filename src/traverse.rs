use std::iter::FusedIterator;

use logger::LogWorker;
use process_fns::{RegionDescriptor, RegionSource};

use crate::{logging::LogHelpers, snapshot::MemorySnapshot};

/// Forward step taken past a region that reports no size, so traversal cannot stall.
pub const MIN_REGION_STEP: u64 = 0x1000;

/// Lazy, forward-only walk over the committed regions of an address space.
///
/// Each step queries the source for the next region and reads it, so nothing is held beyond the
/// snapshot being handed out. Regions that are not committed, that are image-backed (unless
/// enabled), or that yield no bytes are skipped. Snapshots come out in increasing address order.
pub struct Regions<'a, S: RegionSource + ?Sized> {
    source: &'a S,
    log: &'a LogWorker,
    include_images: bool,
    next_address: Option<u64>,
    pending: Option<MemorySnapshot>,
}

impl<'a, S: RegionSource + ?Sized> Regions<'a, S> {
    pub fn new(source: &'a S, log: &'a LogWorker, include_images: bool) -> Self {
        Self {
            source,
            log,
            include_images,
            next_address: Some(0),
            pending: None,
        }
    }

    /// Address the next query will start from, or `None` once the address space is exhausted.
    pub fn next_address(&self) -> Option<u64> {
        self.next_address
    }

    /// Whether another snapshot is available. May query and read ahead by one region.
    pub fn has_next(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = self.capture_next();
        }
        self.pending.is_some()
    }

    fn advance_past(&self, address: u64, region: &RegionDescriptor) -> Option<u64> {
        let start = address.max(region.base_address);
        match region.end_address() {
            Some(end) if end > start => Some(end),
            Some(_) => {
                self.log.log_warn(format!(
                    "Region at {:#x} reports size {}, stepping {:#x} bytes forward",
                    region.base_address, region.region_size, MIN_REGION_STEP
                ));
                start.checked_add(MIN_REGION_STEP)
            }
            None => None,
        }
    }

    fn capture_next(&mut self) -> Option<MemorySnapshot> {
        loop {
            let address = self.next_address?;
            let Some(region) = self.source.query(address) else {
                self.next_address = None;
                return None;
            };
            self.next_address = self.advance_past(address, &region);

            if !region.is_committed() || (region.is_image() && !self.include_images) {
                continue;
            }
            let Ok(len) = usize::try_from(region.region_size) else {
                self.log.log_warn(format!("Skipping oversized region {}", region));
                continue;
            };

            let data = self.source.read(region.base_address, len);
            if data.is_empty() {
                self.log.log_verbose(format!("Region {} is unreadable", region));
                continue;
            }
            if data.len() < len {
                self.log.log_debug(format!(
                    "Short read of region {}: captured {} of {} bytes",
                    region,
                    data.len(),
                    len
                ));
            }
            let snapshot = MemorySnapshot::new(data, &region);
            self.log.log_verbose(format!("Captured {}", snapshot));
            return Some(snapshot);
        }
    }
}

impl<S: RegionSource + ?Sized> Iterator for Regions<'_, S> {
    type Item = MemorySnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        self.pending.take().or_else(|| self.capture_next())
    }
}

impl<S: RegionSource + ?Sized> FusedIterator for Regions<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProcess;
    use logger::{LogManager, loggers::capture::CaptureLogger};
    use process_fns::{BackingType, RegionState};

    #[test]
    fn skips_uncommitted_image_and_unreadable_regions() {
        let process = FakeProcess::new()
            .with_region(0x1000, b"private", RegionState::Committed, BackingType::Private)
            .with_region(0x2000, b"reserved", RegionState::Other(0x2000), BackingType::Private)
            .with_region(0x3000, b"image", RegionState::Committed, BackingType::Image)
            .with_unreadable_region(0x4000, 32)
            .with_region(0x5000, b"mapped", RegionState::Committed, BackingType::Mapped);
        let log = LogWorker::null();

        let bases = Regions::new(&process, &log, false)
            .map(|s| s.base_address())
            .collect::<Vec<_>>();
        assert_eq!(bases, vec![0x1000, 0x5000]);

        let with_images = Regions::new(&process, &log, true)
            .map(|s| s.base_address())
            .collect::<Vec<_>>();
        assert_eq!(with_images, vec![0x1000, 0x3000, 0x5000]);
    }

    #[test]
    fn short_read_shrinks_snapshot() {
        let process = FakeProcess::new().with_truncated_region(0x8000, &[7u8; 100], 40);
        let log = LogWorker::null();

        let snapshots = Regions::new(&process, &log, false).collect::<Vec<_>>();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].base_size(), 40);
        assert_eq!(snapshots[0].region_size(), 100);
    }

    #[test]
    fn zero_size_region_does_not_stall() {
        let capture = CaptureLogger::new();
        let manager = LogManager::new(capture.clone());
        let log = manager.get_log_worker();
        let process = FakeProcess::new()
            .with_descriptor(RegionDescriptor::new(
                0,
                0,
                RegionState::Committed,
                BackingType::Private,
            ))
            .with_region(0x2000, b"after", RegionState::Committed, BackingType::Private);

        let bases = Regions::new(&process, &log, false)
            .map(|s| s.base_address())
            .collect::<Vec<_>>();
        assert_eq!(bases, vec![0x2000]);
        assert!(capture.contents().iter().any(|m| m.contains("stepping")));
    }

    #[test]
    fn region_at_top_of_address_space_ends_traversal() {
        let process = FakeProcess::new().with_region(
            u64::MAX - 3,
            b"top!",
            RegionState::Committed,
            BackingType::Private,
        );
        let log = LogWorker::null();

        let mut regions = Regions::new(&process, &log, false);
        assert!(regions.has_next());
        assert!(regions.has_next());
        assert_eq!(regions.next().map(|s| s.base_size()), Some(4));
        assert_eq!(regions.next_address(), None);
        assert!(!regions.has_next());
        assert!(regions.next().is_none());
    }

    #[test]
    fn each_traversal_queries_again() {
        let process = FakeProcess::new()
            .with_region(0x1000, b"one", RegionState::Committed, BackingType::Private);
        let log = LogWorker::null();

        assert_eq!(Regions::new(&process, &log, false).count(), 1);
        assert_eq!(Regions::new(&process, &log, false).count(), 1);
        assert_eq!(process.query_count(), 4);
    }
}
