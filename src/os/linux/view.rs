//! Foreign-process view addressed by pid
//!
//! Reads and writes go through `process_vm_readv`/`process_vm_writev`, so
//! no file descriptors are held. Protection queries parse
//! `/proc/<pid>/maps`. The allocation triad has no foreign-process
//! equivalent on Linux short of injected code, so it is honoured only when
//! the view targets the current process, through plain
//! `mmap`/`mprotect`/`munmap`.

use crate::core::types::{Address, Protection, SystemError};
use crate::memory::{clamp_span, MemRange, MemView};
use crate::platform;
use std::fs;
use std::io;
use tracing::debug;

/// Memory view over another process, addressed by pid.
pub struct ProcessView {
    pid: libc::pid_t,
}

impl ProcessView {
    /// Opens a view over the process identified by `pid`.
    ///
    /// Probes the target with a null signal: a vanished process surfaces
    /// as [`SystemError::OperationFailed`], a privilege refusal as
    /// [`SystemError::AccessDenied`].
    pub fn open(pid: u32) -> Result<Self, SystemError> {
        let pid = pid as libc::pid_t;
        if unsafe { libc::kill(pid, 0) } == 0 {
            debug!(pid, "opened process for memory access");
            return Ok(ProcessView { pid });
        }
        let os_error = io::Error::last_os_error();
        if os_error.raw_os_error() == Some(libc::EPERM) {
            Err(SystemError::access_denied(format!("kill({pid}, 0): {os_error}")))
        } else {
            Err(SystemError::operation_failed(format!(
                "kill({pid}, 0): {os_error}"
            )))
        }
    }

    /// A view over the current process
    pub fn current() -> Self {
        ProcessView {
            pid: unsafe { libc::getpid() },
        }
    }

    /// Identifier of the target process
    pub fn pid(&self) -> u32 {
        self.pid as u32
    }

    fn is_own_process(&self) -> bool {
        self.pid == unsafe { libc::getpid() }
    }

    fn read_chunk(&self, address: Address, buf: &mut [u8]) -> usize {
        let local = libc::iovec {
            iov_base: buf.as_mut_ptr().cast(),
            iov_len: buf.len(),
        };
        let remote = libc::iovec {
            iov_base: address.as_usize() as *mut libc::c_void,
            iov_len: buf.len(),
        };
        let transferred =
            unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };
        if transferred < 0 {
            0
        } else {
            transferred as usize
        }
    }

    fn write_chunk(&self, address: Address, data: &[u8]) -> usize {
        let local = libc::iovec {
            iov_base: data.as_ptr() as *mut libc::c_void,
            iov_len: data.len(),
        };
        let remote = libc::iovec {
            iov_base: address.as_usize() as *mut libc::c_void,
            iov_len: data.len(),
        };
        let transferred =
            unsafe { libc::process_vm_writev(self.pid, &local, 1, &remote, 1, 0) };
        if transferred < 0 {
            0
        } else {
            transferred as usize
        }
    }

    fn read_paged(&self, address: Address, buf: &mut [u8]) -> usize {
        let page = platform::page_size();
        let mut total = 0;
        while total < buf.len() {
            let at = address.wrapping_add(total);
            let until_boundary = page - (at.as_usize() % page);
            let chunk_len = until_boundary.min(buf.len() - total);
            let got = self.read_chunk(at, &mut buf[total..total + chunk_len]);
            total += got;
            if got < chunk_len {
                break;
            }
        }
        total
    }

    fn write_paged(&self, address: Address, data: &[u8]) -> usize {
        let page = platform::page_size();
        let mut total = 0;
        while total < data.len() {
            let at = address.wrapping_add(total);
            let until_boundary = page - (at.as_usize() % page);
            let chunk_len = until_boundary.min(data.len() - total);
            let put = self.write_chunk(at, &data[total..total + chunk_len]);
            total += put;
            if put < chunk_len {
                break;
            }
        }
        total
    }
}

impl MemView for ProcessView {
    fn read(&self, address: Address, buf: &mut [u8]) -> usize {
        let len = clamp_span(address, buf.len());
        let buf = &mut buf[..len];
        if buf.is_empty() {
            return 0;
        }
        let bulk = self.read_chunk(address, buf);
        if bulk == buf.len() {
            return bulk;
        }
        self.read_paged(address, buf)
    }

    fn write(&self, address: Address, data: &[u8]) -> usize {
        let len = clamp_span(address, data.len());
        let data = &data[..len];
        if data.is_empty() {
            return 0;
        }
        let bulk = self.write_chunk(address, data);
        if bulk == data.len() {
            return bulk;
        }
        self.write_paged(address, data)
    }

    fn allocate(
        &self,
        preferred: Option<Address>,
        size: usize,
        protection: Protection,
    ) -> Option<MemRange<'_, Self>> {
        if !self.is_own_process() {
            debug!(
                pid = self.pid,
                "foreign allocation is not supported on this platform"
            );
            return None;
        }
        let size = platform::align_end(Address::new(size)).as_usize();
        if size == 0 {
            return None;
        }

        // The preferred address is passed as a plain hint, never MAP_FIXED.
        let hint = preferred.map_or(std::ptr::null_mut(), |a| a.as_usize() as *mut libc::c_void);
        let base = unsafe {
            libc::mmap(
                hint,
                size,
                protection_to_native(protection),
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if base == libc::MAP_FAILED {
            debug!(size, "mmap failed");
            return None;
        }
        Some(MemRange::new(self, Address::new(base as usize), size))
    }

    fn free(&self, address: Address, size: usize) -> bool {
        if !self.is_own_process() {
            return false;
        }
        let size = platform::align_end(Address::new(size)).as_usize();
        unsafe { libc::munmap(address.as_usize() as *mut libc::c_void, size) == 0 }
    }

    fn protect(&self, address: Address, size: usize, protection: Protection) -> bool {
        if !self.is_own_process() {
            return false;
        }
        let ok = unsafe {
            libc::mprotect(
                address.as_usize() as *mut libc::c_void,
                size,
                protection_to_native(protection),
            ) == 0
        };
        if !ok {
            debug!(%address, size, "mprotect failed");
        }
        ok
    }

    fn protection(&self, address: Address) -> Option<Protection> {
        let maps = fs::read_to_string(format!("/proc/{}/maps", self.pid)).ok()?;
        let target = address.as_usize();
        for line in maps.lines() {
            let Some((span, rest)) = line.split_once(' ') else {
                continue;
            };
            let Some((start, end)) = span.split_once('-') else {
                continue;
            };
            let (Ok(start), Ok(end)) = (
                usize::from_str_radix(start, 16),
                usize::from_str_radix(end, 16),
            ) else {
                continue;
            };
            // Lines are sorted by start address.
            if target < start {
                break;
            }
            if target >= end {
                continue;
            }
            let perms = rest.split(' ').next().unwrap_or("");
            let mut flags = perms.chars();
            let read = flags.next() == Some('r');
            let write = flags.next() == Some('w');
            let execute = flags.next() == Some('x');
            return Some(Protection::from_bits(read, write, execute));
        }
        None
    }
}

/// Translates a protection state to `PROT_*` bits
pub fn protection_to_native(protection: Protection) -> libc::c_int {
    let mut native = libc::PROT_NONE;
    if protection.is_readable() {
        native |= libc::PROT_READ;
    }
    if protection.is_writable() {
        native |= libc::PROT_WRITE;
    }
    if protection.is_executable() {
        native |= libc::PROT_EXEC;
    }
    native
}

/// Translates `PROT_*` bits back; write pulls read in with it
pub fn protection_from_native(value: libc::c_int) -> Protection {
    Protection::from_bits(
        value & libc::PROT_READ != 0,
        value & libc::PROT_WRITE != 0,
        value & libc::PROT_EXEC != 0,
    )
}
