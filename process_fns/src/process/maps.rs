//! Parsing of `/proc/<pid>/maps` lines into region descriptors.
//!
//! ```text
//! address           perms offset  dev   inode   pathname
//! 00400000-00452000 r-xp 00000000 08:02 173521  /usr/bin/ls
//! ```

use crate::region::{BackingType, RegionDescriptor, RegionState};

/// Parses one maps line. Returns `None` for lines that are not mappings.
pub fn parse_line(line: &str) -> Option<RegionDescriptor> {
    let mut fields = line.split_whitespace();
    let range = fields.next()?;
    let perms = fields.next()?.as_bytes();
    let _offset = fields.next()?;
    let _device = fields.next()?;
    let inode: u64 = fields.next()?.parse().ok()?;
    let path = fields.next();

    let (start, end) = range.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    if end < start || perms.len() < 4 {
        return None;
    }

    let readable = perms[0] == b'r';
    let executable = perms[2] == b'x';
    let shared = perms[3] == b's';
    let file_backed = inode != 0 && path.is_some_and(|p| p.starts_with('/'));

    let state = if readable {
        RegionState::Committed
    } else {
        RegionState::Other(0)
    };
    let backing = if file_backed && executable {
        BackingType::Image
    } else if file_backed || shared {
        BackingType::Mapped
    } else {
        BackingType::Private
    };

    Some(RegionDescriptor::new(start, end - start, state, backing))
}

/// Finds the mapping containing `address`, or the lowest one above it.
pub fn region_at_or_above(content: &str, address: u64) -> Option<RegionDescriptor> {
    content
        .lines()
        .filter_map(parse_line)
        .find(|region| region.end_address().is_none_or(|end| end > address))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPS: &str = "\
00400000-00452000 r-xp 00000000 08:02 173521      /usr/bin/ls
00651000-00652000 r--p 00051000 08:02 173521      /usr/bin/ls
00652000-00655000 rw-p 00052000 08:02 173521      /usr/bin/ls
01e3a000-01e5b000 rw-p 00000000 00:00 0           [heap]
7f2c4c000000-7f2c4c021000 ---p 00000000 00:00 0
7f2c50000000-7f2c50001000 rw-s 00000000 00:05 98304       /SYSV00000000 (deleted)
7ffd4a1e0000-7ffd4a201000 rw-p 00000000 00:00 0           [stack]
";

    #[test]
    fn classifies_mappings() {
        let regions = MAPS.lines().filter_map(parse_line).collect::<Vec<_>>();
        assert_eq!(regions.len(), 7);

        assert_eq!(regions[0].base_address, 0x400000);
        assert_eq!(regions[0].region_size, 0x52000);
        assert_eq!(regions[0].backing, BackingType::Image);
        assert_eq!(regions[1].backing, BackingType::Mapped);
        assert_eq!(regions[2].backing, BackingType::Mapped);
        assert_eq!(regions[3].backing, BackingType::Private);
        assert!(regions[3].is_committed());
        assert_eq!(regions[4].state, RegionState::Other(0));
        assert_eq!(regions[5].backing, BackingType::Mapped);
        assert_eq!(regions[6].backing, BackingType::Private);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_line("").is_none());
        assert!(parse_line("not a mapping").is_none());
        assert!(parse_line("zz-00 rw-p 0 00:00 0").is_none());
        assert!(parse_line("2000-1000 rw-p 00000000 00:00 0").is_none());
    }

    #[test]
    fn finds_covering_or_next_region() {
        let inside = region_at_or_above(MAPS, 0x400010).unwrap();
        assert_eq!(inside.base_address, 0x400000);

        let gap = region_at_or_above(MAPS, 0x452000).unwrap();
        assert_eq!(gap.base_address, 0x651000);

        assert!(region_at_or_above(MAPS, 0x7ffd4a201000).is_none());
    }
}
