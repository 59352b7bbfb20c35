use std::{
    fs::{self, File},
    io::ErrorKind,
    os::unix::fs::FileExt,
    path::PathBuf,
};

use crate::{OpenError, RegionSource, region::RegionDescriptor};

use super::{maps, name_matches};

/// Read and query access to another process through procfs.
///
/// The `/proc/<pid>/mem` file is opened once and closed when the handle is dropped.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    mem: File,
    maps_path: PathBuf,
}

impl ProcessHandle {
    pub fn open(pid: u32) -> Result<Self, OpenError> {
        let proc_dir = PathBuf::from(format!("/proc/{}", pid));
        if !proc_dir.try_exists()? {
            return Err(OpenError::NoSuchProcess(pid));
        }
        let mem = File::open(proc_dir.join("mem"))?;
        Ok(Self {
            pid,
            mem,
            maps_path: proc_dir.join("maps"),
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl RegionSource for ProcessHandle {
    fn query(&self, address: u64) -> Option<RegionDescriptor> {
        let content = fs::read_to_string(&self.maps_path).ok()?;
        maps::region_at_or_above(&content, address)
    }

    fn read(&self, address: u64, len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let Some(at) = address.checked_add(filled as u64) else {
                break;
            };
            match self.mem.read_at(&mut data[filled..], at) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        data.truncate(filled);
        data
    }
}

/// Executable name of a process: the target of `/proc/<pid>/exe`, falling back to `comm`.
fn executable_name(pid: u32) -> Option<String> {
    fs::read_link(format!("/proc/{}/exe", pid))
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .or_else(|| {
            fs::read_to_string(format!("/proc/{}/comm", pid))
                .ok()
                .map(|comm| comm.trim_end().to_string())
        })
}

pub fn find_process_id(name: &str) -> Option<u32> {
    let mut pids = fs::read_dir("/proc")
        .ok()?
        .flatten()
        .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
        .collect::<Vec<_>>();
    pids.sort_unstable();
    pids.into_iter()
        .find(|&pid| executable_name(pid).is_some_and(|exe| name_matches(&exe, name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_own_memory() {
        let data = b"procfs read-back check".to_vec();
        let handle = ProcessHandle::open(std::process::id()).unwrap();
        let read = handle.read(data.as_ptr() as u64, data.len());
        assert_eq!(read, data);
    }

    #[test]
    fn queries_own_regions() {
        let handle = ProcessHandle::open(std::process::id()).unwrap();
        let first = handle.query(0).unwrap();
        assert!(first.region_size > 0);

        let data = vec![0x5au8; 64];
        let addr = data.as_ptr() as u64;
        let covering = handle.query(addr).unwrap();
        assert!(covering.base_address <= addr);
        assert!(covering.end_address().unwrap() > addr);
        assert!(covering.is_committed());
    }

    #[test]
    fn finds_own_process_by_name() {
        let exe = executable_name(std::process::id()).unwrap();
        assert!(find_process_id(&exe).is_some());
    }

    #[test]
    fn missing_process_fails_to_open() {
        assert!(matches!(
            ProcessHandle::open(u32::MAX),
            Err(OpenError::NoSuchProcess(_))
        ));
    }
}
