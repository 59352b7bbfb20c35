use std::{convert::Infallible, fmt::Display};

use process_fns::{BackingType, RegionDescriptor};

use crate::error::FinderError;

/// Returned by every scan predicate and match callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanFlow {
    Continue,
    Stop,
}

/// How a sweep ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A predicate asked to stop
    Stopped,
    /// Every position was visited
    Exhausted,
}

impl ScanOutcome {
    pub fn is_stopped(&self) -> bool {
        matches!(self, ScanOutcome::Stopped)
    }
}

/// A point-in-time copy of one memory region with a movable read cursor.
///
/// Every access is relative to the cursor: index `i` means the byte at `offset + i` of the
/// captured buffer. The buffer may be shorter than the region when the read was truncated; the
/// snapshot then covers only the bytes actually captured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemorySnapshot {
    data: Vec<u8>,
    base_address: u64,
    region_size: u64,
    backing: BackingType,
    offset: usize,
}

impl MemorySnapshot {
    pub fn new(data: Vec<u8>, region: &RegionDescriptor) -> Self {
        Self {
            data,
            base_address: region.base_address,
            region_size: region.region_size,
            backing: region.backing,
            offset: 0,
        }
    }

    /// Address of the byte under the cursor.
    pub fn address(&self) -> u64 {
        self.base_address.wrapping_add(self.offset as u64)
    }

    pub fn hex_address(&self) -> String {
        format!("{:x}", self.address())
    }

    /// Bytes remaining from the cursor to the end of the capture.
    pub fn size(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    /// Number of bytes captured.
    pub fn base_size(&self) -> usize {
        self.data.len()
    }

    /// Size the region was reported with. At least [`base_size`](Self::base_size).
    pub fn region_size(&self) -> u64 {
        self.region_size
    }

    pub fn backing(&self) -> BackingType {
        self.backing
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_truncated(&self) -> bool {
        (self.data.len() as u64) < self.region_size
    }

    /// Moves the cursor to `offset`, which must lie inside the capture.
    pub fn seek(&mut self, offset: usize) -> Result<(), FinderError> {
        if offset >= self.data.len() {
            return Err(FinderError::OutOfBounds {
                index: offset,
                len: 1,
                available: self.data.len(),
            });
        }
        self.offset = offset;
        Ok(())
    }

    /// The captured bytes from the cursor to the end.
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.offset..]
    }

    fn checked_range(&self, index: usize, len: usize) -> Result<std::ops::Range<usize>, FinderError> {
        let out_of_bounds = || FinderError::OutOfBounds {
            index,
            len,
            available: self.size(),
        };
        let start = self.offset.checked_add(index).ok_or_else(out_of_bounds)?;
        let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > self.data.len() {
            return Err(out_of_bounds());
        }
        Ok(start..end)
    }

    pub fn byte_at(&self, index: usize) -> Result<u8, FinderError> {
        let range = self.checked_range(index, 1)?;
        Ok(self.data[range.start])
    }

    pub fn slice_at(&self, index: usize, len: usize) -> Result<&[u8], FinderError> {
        let range = self.checked_range(index, len)?;
        Ok(&self.data[range])
    }

    /// Whether the byte at `index` is printable text: anything outside the C0 (`0x00..=0x1f`)
    /// and DEL/C1 (`0x7f..=0x9f`) control ranges. Out-of-range indices are not printable.
    pub fn is_printable(&self, index: usize) -> bool {
        self.byte_at(index).is_ok_and(is_printable_byte)
    }

    /// The run of printable bytes starting at `index`, at most `max` long.
    pub fn printable_run(&self, index: usize, max: usize) -> &[u8] {
        let Some(start) = self.offset.checked_add(index).filter(|&s| s <= self.data.len()) else {
            return &[];
        };
        let tail = &self.data[start..];
        let len = tail
            .iter()
            .take(max)
            .take_while(|&&b| is_printable_byte(b))
            .count();
        &tail[..len]
    }

    /// Whether `pattern` occurs at `index`. Running past the end of the capture is a mismatch.
    pub fn matches_at(&self, pattern: &[u8], index: usize) -> bool {
        self.checked_range(index, pattern.len())
            .is_ok_and(|range| &self.data[range] == pattern)
    }

    /// Moves the cursor over every captured offset in order, calling `predicate` at each.
    ///
    /// The cursor is left where the predicate stopped, or on the last byte.
    pub fn scan_all<F>(&mut self, mut predicate: F) -> ScanOutcome
    where
        F: FnMut(&MemorySnapshot) -> ScanFlow,
    {
        match self.try_scan_all(|snapshot| Ok::<_, Infallible>(predicate(snapshot))) {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Like [`scan_all`](Self::scan_all), but an error from the predicate aborts the sweep and
    /// is returned.
    pub fn try_scan_all<F, E>(&mut self, mut predicate: F) -> Result<ScanOutcome, E>
    where
        F: FnMut(&MemorySnapshot) -> Result<ScanFlow, E>,
    {
        for offset in 0..self.data.len() {
            self.offset = offset;
            if predicate(self)? == ScanFlow::Stop {
                return Ok(ScanOutcome::Stopped);
            }
        }
        Ok(ScanOutcome::Exhausted)
    }
}

fn is_printable_byte(byte: u8) -> bool {
    !matches!(byte, 0x00..=0x1f | 0x7f..=0x9f)
}

impl Display for MemorySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:#x} - {:#x} ({}, {} bytes)",
            self.base_address,
            self.base_address.wrapping_add(self.data.len() as u64),
            self.backing,
            self.data.len()
        )
    }
}
