//! Foreign-process view over a Mach task port

use super::port::TaskPort;
use crate::core::types::{Address, Protection, SystemError};
use crate::memory::{clamp_span, MemRange, MemView};
use crate::platform;
use mach2::kern_return::KERN_SUCCESS;
use mach2::message::mach_msg_type_number_t;
use mach2::vm::{
    mach_vm_allocate, mach_vm_deallocate, mach_vm_protect, mach_vm_read_overwrite, mach_vm_region,
    mach_vm_write,
};
use mach2::vm_prot::{vm_prot_t, VM_PROT_EXECUTE, VM_PROT_NONE, VM_PROT_READ, VM_PROT_WRITE};
use mach2::vm_region::{
    vm_region_basic_info_data_64_t, vm_region_info_t, VM_REGION_BASIC_INFO_64,
    VM_REGION_BASIC_INFO_COUNT_64,
};
use mach2::vm_statistics::{VM_FLAGS_ANYWHERE, VM_FLAGS_FIXED};
use mach2::vm_types::{mach_vm_address_t, mach_vm_size_t};
use std::mem;
use tracing::debug;

/// Memory view over another process, backed by a Mach task port.
///
/// Reads try one bulk `mach_vm_read_overwrite` and degrade to page-sized
/// transfers, accumulating until the first inaccessible page; writes
/// mirror that with `mach_vm_write`.
pub struct ProcessView {
    task: TaskPort,
    pid: i32,
}

impl ProcessView {
    /// Opens a view over the process identified by `pid`
    pub fn open(pid: u32) -> Result<Self, SystemError> {
        let task = TaskPort::for_pid(pid as i32)?;
        debug!(pid, "obtained task port for memory access");
        Ok(ProcessView {
            task,
            pid: pid as i32,
        })
    }

    /// A view over the current process, backed by `mach_task_self`
    pub fn current() -> Self {
        ProcessView {
            task: TaskPort::own_task(),
            pid: std::process::id() as i32,
        }
    }

    /// Identifier of the target process
    pub fn pid(&self) -> u32 {
        self.pid as u32
    }

    fn read_chunk(&self, address: Address, buf: &mut [u8]) -> usize {
        let mut out: mach_vm_size_t = 0;
        let result = unsafe {
            mach_vm_read_overwrite(
                self.task.raw(),
                address.as_usize() as mach_vm_address_t,
                buf.len() as mach_vm_size_t,
                buf.as_mut_ptr() as mach_vm_address_t,
                &mut out,
            )
        };
        if result != KERN_SUCCESS {
            return 0;
        }
        out as usize
    }

    fn write_chunk(&self, address: Address, data: &[u8]) -> usize {
        let result = unsafe {
            mach_vm_write(
                self.task.raw(),
                address.as_usize() as mach_vm_address_t,
                data.as_ptr() as usize as mach2::vm_types::vm_offset_t,
                data.len() as mach_msg_type_number_t,
            )
        };
        if result != KERN_SUCCESS {
            return 0;
        }
        data.len()
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
        let size = platform::align_end(Address::new(size)).as_usize();
        if size == 0 {
            return None;
        }

        let mut base: mach_vm_address_t = preferred.map_or(0, |a| a.as_usize() as u64);
        let flags = if preferred.is_some() {
            VM_FLAGS_FIXED
        } else {
            VM_FLAGS_ANYWHERE
        };
        let mut result = unsafe {
            mach_vm_allocate(self.task.raw(), &mut base, size as mach_vm_size_t, flags)
        };
        if result != KERN_SUCCESS && preferred.is_some() {
            // The preferred address was only a hint; let the kernel pick.
            base = 0;
            result = unsafe {
                mach_vm_allocate(
                    self.task.raw(),
                    &mut base,
                    size as mach_vm_size_t,
                    VM_FLAGS_ANYWHERE,
                )
            };
        }
        if result != KERN_SUCCESS {
            debug!(pid = self.pid, size, result, "mach_vm_allocate failed");
            return None;
        }

        let protect_result = unsafe {
            mach_vm_protect(
                self.task.raw(),
                base,
                size as mach_vm_size_t,
                0,
                protection_to_native(protection),
            )
        };
        if protect_result != KERN_SUCCESS {
            // Roll the partial mapping back rather than hand out pages
            // with the wrong protection.
            unsafe {
                mach_vm_deallocate(self.task.raw(), base, size as mach_vm_size_t);
            }
            debug!(
                pid = self.pid,
                result = protect_result,
                "mach_vm_protect on fresh mapping failed"
            );
            return None;
        }

        Some(MemRange::new(self, Address::new(base as usize), size))
    }

    fn free(&self, address: Address, size: usize) -> bool {
        let result = unsafe {
            mach_vm_deallocate(
                self.task.raw(),
                address.as_usize() as mach_vm_address_t,
                size as mach_vm_size_t,
            )
        };
        result == KERN_SUCCESS
    }

    fn protect(&self, address: Address, size: usize, protection: Protection) -> bool {
        let result = unsafe {
            mach_vm_protect(
                self.task.raw(),
                address.as_usize() as mach_vm_address_t,
                size as mach_vm_size_t,
                0,
                protection_to_native(protection),
            )
        };
        if result != KERN_SUCCESS {
            debug!(pid = self.pid, %address, result, "mach_vm_protect failed");
        }
        result == KERN_SUCCESS
    }

    fn protection(&self, address: Address) -> Option<Protection> {
        let mut region_base = address.as_usize() as mach_vm_address_t;
        let mut region_size: mach_vm_size_t = 0;
        let mut info: vm_region_basic_info_data_64_t = unsafe { mem::zeroed() };
        let mut count: mach_msg_type_number_t = VM_REGION_BASIC_INFO_COUNT_64;
        let mut object_name = 0;

        let result = unsafe {
            mach_vm_region(
                self.task.raw(),
                &mut region_base,
                &mut region_size,
                VM_REGION_BASIC_INFO_64,
                &mut info as *mut _ as vm_region_info_t,
                &mut count,
                &mut object_name,
            )
        };
        if result != KERN_SUCCESS {
            return None;
        }
        // mach_vm_region reports the region at or above the queried
        // address; a hole means no region contains it.
        if region_base > address.as_usize() as mach_vm_address_t {
            return None;
        }
        Some(protection_from_native(info.protection))
    }
}

/// Translates a protection state to `VM_PROT_*` bits
pub fn protection_to_native(protection: Protection) -> vm_prot_t {
    let mut native = VM_PROT_NONE;
    if protection.is_readable() {
        native |= VM_PROT_READ;
    }
    if protection.is_writable() {
        native |= VM_PROT_WRITE;
    }
    if protection.is_executable() {
        native |= VM_PROT_EXECUTE;
    }
    native
}

/// Translates `VM_PROT_*` bits back. A write-only word has no exact
/// representation; write pulls read in with it.
pub fn protection_from_native(value: vm_prot_t) -> Protection {
    Protection::from_bits(
        value & VM_PROT_READ != 0,
        value & VM_PROT_WRITE != 0,
        value & VM_PROT_EXECUTE != 0,
    )
}
