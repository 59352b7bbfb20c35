use std::ptr::addr_of_mut;

use windows::Win32::{
    Foundation::{CloseHandle, HANDLE},
    System::{
        Diagnostics::{
            Debug::ReadProcessMemory,
            ToolHelp::{
                CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
                TH32CS_SNAPPROCESS,
            },
        },
        Memory::{MEMORY_BASIC_INFORMATION, VirtualQueryEx},
        Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ},
    },
};

use crate::{OpenError, RegionSource, region::RegionDescriptor};

use super::name_matches;

/// An open process handle with `PROCESS_VM_READ | PROCESS_QUERY_INFORMATION` access.
///
/// The handle is closed exactly once, when this value is dropped.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    handle: HANDLE,
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        let _ = unsafe { CloseHandle(self.handle) };
    }
}

impl ProcessHandle {
    pub fn open(pid: u32) -> Result<Self, OpenError> {
        let handle =
            unsafe { OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_INFORMATION, false, pid) }?;
        Ok(Self { pid, handle })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl RegionSource for ProcessHandle {
    fn query(&self, address: u64) -> Option<RegionDescriptor> {
        let address = usize::try_from(address).ok()?;
        unsafe {
            let mut mbi: MEMORY_BASIC_INFORMATION = std::mem::zeroed();
            let size = VirtualQueryEx(
                self.handle,
                Some(address as *const std::ffi::c_void),
                addr_of_mut!(mbi),
                size_of::<MEMORY_BASIC_INFORMATION>(),
            );
            if size == size_of::<MEMORY_BASIC_INFORMATION>() {
                Some(RegionDescriptor::from_raw(
                    mbi.BaseAddress as u64,
                    mbi.RegionSize as u64,
                    mbi.State.0,
                    mbi.Type.0,
                ))
            } else {
                None
            }
        }
    }

    fn read(&self, address: u64, len: usize) -> Vec<u8> {
        let Ok(address) = usize::try_from(address) else {
            return Vec::new();
        };
        let mut data = vec![0u8; len];
        let mut bytes_read = 0_usize;
        // A partial copy reports an error but still fills `bytes_read`.
        let _ = unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const std::ffi::c_void,
                data.as_mut_ptr() as *mut _,
                len,
                Some(addr_of_mut!(bytes_read)),
            )
        };
        data.truncate(bytes_read.min(len));
        data
    }
}

/// Closes the Toolhelp snapshot on every exit path of the lookup.
struct SnapshotGuard(HANDLE);

impl Drop for SnapshotGuard {
    fn drop(&mut self) {
        let _ = unsafe { CloseHandle(self.0) };
    }
}

pub fn find_process_id(name: &str) -> Option<u32> {
    let snapshot = SnapshotGuard(unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }.ok()?);
    let mut entry = PROCESSENTRY32W {
        dwSize: size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };
    unsafe { Process32FirstW(snapshot.0, addr_of_mut!(entry)) }.ok()?;
    loop {
        let len = entry
            .szExeFile
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(entry.szExeFile.len());
        let exe = String::from_utf16_lossy(&entry.szExeFile[..len]);
        if name_matches(&exe, name) {
            return Some(entry.th32ProcessID);
        }
        unsafe { Process32NextW(snapshot.0, addr_of_mut!(entry)) }.ok()?;
    }
}
