//! Foreign-process view over a Windows process handle

use super::bindings;
use super::handle::Handle;
use crate::core::types::{Address, Protection, SystemError};
use crate::memory::{clamp_span, MemRange, MemView};
use crate::platform;
use tracing::debug;
use winapi::um::processthreadsapi::GetCurrentProcess;
use winapi::um::winnt::MEM_COMMIT;

/// Memory view over another process, backed by a process handle.
///
/// Reads and writes try one bulk transfer first and degrade to
/// page-by-page transfers, accumulating until the first inaccessible page.
pub struct ProcessView {
    handle: Handle,
    pid: u32,
}

impl ProcessView {
    /// Opens a view over the process identified by `pid`.
    ///
    /// Requires query, read, write and operation access; missing
    /// privileges surface as [`SystemError::AccessDenied`].
    pub fn open(pid: u32) -> Result<Self, SystemError> {
        let raw = bindings::open_process(pid, bindings::view_access())?;
        debug!(pid, "opened process for memory access");
        Ok(ProcessView {
            handle: Handle::new(raw),
            pid,
        })
    }

    /// A view over the current process.
    ///
    /// Backed by the `GetCurrentProcess()` pseudo handle, which is owned
    /// by the OS and never closed.
    pub fn current() -> Self {
        ProcessView {
            handle: Handle::new(unsafe { GetCurrentProcess() }),
            pid: std::process::id(),
        }
    }

    /// Identifier of the target process
    pub fn pid(&self) -> u32 {
        self.pid
    }

    fn read_paged(&self, address: Address, buf: &mut [u8]) -> usize {
        let page = platform::page_size();
        let mut total = 0;
        while total < buf.len() {
            let at = address.wrapping_add(total);
            let until_boundary = page - (at.as_usize() % page);
            let chunk_len = until_boundary.min(buf.len() - total);
            let got = unsafe {
                bindings::read_process_memory(
                    self.handle.raw(),
                    at,
                    &mut buf[total..total + chunk_len],
                )
            };
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
            let put = unsafe {
                bindings::write_process_memory(
                    self.handle.raw(),
                    at,
                    &data[total..total + chunk_len],
                )
            };
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
        let bulk = unsafe { bindings::read_process_memory(self.handle.raw(), address, buf) };
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
        let bulk = unsafe { bindings::write_process_memory(self.handle.raw(), address, data) };
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
        let size = platform::align_end(Address::new(size)).as_usize();
        if size == 0 {
            return None;
        }
        let mut base =
            unsafe { bindings::virtual_alloc_ex(self.handle.raw(), preferred, size, protection) };
        if base.is_none() && preferred.is_some() {
            // The preferred address was only a hint; fall back to letting
            // the kernel place the mapping.
            base = unsafe { bindings::virtual_alloc_ex(self.handle.raw(), None, size, protection) };
        }
        if base.is_none() {
            debug!(pid = self.pid, size, "VirtualAllocEx failed");
        }
        Some(MemRange::new(self, base?, size))
    }

    /// Releases pages mapped by [`allocate`](MemView::allocate).
    ///
    /// `MEM_RELEASE` frees the whole original allocation; the `size`
    /// argument is not forwarded to the OS.
    fn free(&self, address: Address, _size: usize) -> bool {
        unsafe { bindings::virtual_free_ex(self.handle.raw(), address) }
    }

    fn protect(&self, address: Address, size: usize, protection: Protection) -> bool {
        let ok = unsafe {
            bindings::virtual_protect_ex(self.handle.raw(), address, size, protection)
        };
        if !ok {
            debug!(pid = self.pid, %address, "VirtualProtectEx failed");
        }
        ok
    }

    fn protection(&self, address: Address) -> Option<Protection> {
        let info = unsafe { bindings::virtual_query_ex(self.handle.raw(), address) }?;
        if info.State == MEM_COMMIT {
            bindings::protection_from_native(info.Protect)
        } else {
            // Reserved and free regions have no accessible pages.
            Some(Protection::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_invalid_pid_fails() {
        assert!(ProcessView::open(0).is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_current_process_round_trip() {
        let view = ProcessView::current();
        assert_eq!(view.pid(), std::process::id());

        let value: u32 = 0x1234_5678;
        let address = Address::from(&value as *const u32 as *const u8);
        assert_eq!(view.read_value::<u32>(address), Some(0x1234_5678));
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_current_handle_survives_drop() {
        // Dropping a current-process view must not close the pseudo
        // handle used by every later view.
        drop(ProcessView::current());
        let view = ProcessView::current();
        let value: u16 = 7;
        let address = Address::from(&value as *const u16 as *const u8);
        assert_eq!(view.read_value::<u16>(address), Some(7));
    }
}
