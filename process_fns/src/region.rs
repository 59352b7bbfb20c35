use std::fmt::Display;

pub const MEM_COMMIT: u32 = 0x1000;
pub const MEM_PRIVATE: u32 = 0x20000;
pub const MEM_MAPPED: u32 = 0x40000;
pub const MEM_IMAGE: u32 = 0x100_0000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegionState {
    Committed,
    Other(u32),
}

impl RegionState {
    pub fn from_raw(raw: u32) -> Self {
        if raw == MEM_COMMIT {
            RegionState::Committed
        } else {
            RegionState::Other(raw)
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, RegionState::Committed)
    }
}

/// What backs the pages of a region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackingType {
    /// Mapped from an executable or library image
    Image,
    Mapped,
    Private,
    Unknown(u32),
}

impl BackingType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            MEM_IMAGE => BackingType::Image,
            MEM_MAPPED => BackingType::Mapped,
            MEM_PRIVATE => BackingType::Private,
            other => BackingType::Unknown(other),
        }
    }
}

impl Display for BackingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackingType::Image => write!(f, "image"),
            BackingType::Mapped => write!(f, "mapped"),
            BackingType::Private => write!(f, "private"),
            BackingType::Unknown(raw) => write!(f, "{:#x}", raw),
        }
    }
}

/// Metadata for one region of a process's address space, as reported by a single query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegionDescriptor {
    pub base_address: u64,
    pub region_size: u64,
    pub state: RegionState,
    pub backing: BackingType,
}

impl RegionDescriptor {
    pub fn new(base_address: u64, region_size: u64, state: RegionState, backing: BackingType) -> Self {
        Self {
            base_address,
            region_size,
            state,
            backing,
        }
    }

    pub fn from_raw(base_address: u64, region_size: u64, state: u32, backing: u32) -> Self {
        Self::new(
            base_address,
            region_size,
            RegionState::from_raw(state),
            BackingType::from_raw(backing),
        )
    }

    /// One past the last address of the region, or `None` if that would overflow.
    pub fn end_address(&self) -> Option<u64> {
        self.base_address.checked_add(self.region_size)
    }

    pub fn is_committed(&self) -> bool {
        self.state.is_committed()
    }

    pub fn is_image(&self) -> bool {
        self.backing == BackingType::Image
    }
}

impl Display for RegionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:#x} ({} bytes, {:?}, {})",
            self.base_address, self.region_size, self.state, self.backing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_raw_codes() {
        assert_eq!(RegionState::from_raw(MEM_COMMIT), RegionState::Committed);
        assert_eq!(RegionState::from_raw(0x2000), RegionState::Other(0x2000));
        assert_eq!(BackingType::from_raw(MEM_IMAGE), BackingType::Image);
        assert_eq!(BackingType::from_raw(MEM_MAPPED), BackingType::Mapped);
        assert_eq!(BackingType::from_raw(MEM_PRIVATE), BackingType::Private);
        assert_eq!(BackingType::from_raw(0x7), BackingType::Unknown(0x7));
    }

    #[test]
    fn unknown_backing_displays_as_hex() {
        assert_eq!(BackingType::Unknown(0x80000).to_string(), "0x80000");
        assert_eq!(BackingType::Private.to_string(), "private");
    }

    #[test]
    fn end_address_is_checked() {
        let region = RegionDescriptor::from_raw(0x1000, 0x2000, MEM_COMMIT, MEM_PRIVATE);
        assert_eq!(region.end_address(), Some(0x3000));
        assert!(region.is_committed());
        assert!(!region.is_image());

        let wrapping = RegionDescriptor::from_raw(u64::MAX - 1, 0x10, MEM_COMMIT, MEM_IMAGE);
        assert_eq!(wrapping.end_address(), None);
        assert!(wrapping.is_image());
    }
}
