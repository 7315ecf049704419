//! Safe wrappers over the Win32 process-memory APIs

use crate::core::types::{Address, Protection, SystemError};
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE, LPVOID};
use winapi::um::memoryapi::{
    ReadProcessMemory, VirtualAllocEx, VirtualFreeEx, VirtualProtectEx, VirtualQueryEx,
    WriteProcessMemory,
};
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::winnt::{
    HANDLE, MEMORY_BASIC_INFORMATION, MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_EXECUTE,
    PAGE_EXECUTE_READ, PAGE_EXECUTE_READWRITE, PAGE_EXECUTE_WRITECOPY, PAGE_NOACCESS,
    PAGE_READONLY, PAGE_READWRITE, PAGE_WRITECOPY, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION,
    PROCESS_VM_READ, PROCESS_VM_WRITE,
};

const ERROR_ACCESS_DENIED: i32 = 5;

/// Access mask needed for the full view surface
pub fn view_access() -> DWORD {
    PROCESS_QUERY_INFORMATION | PROCESS_VM_READ | PROCESS_VM_WRITE | PROCESS_VM_OPERATION
}

/// Opens a process for memory access
pub fn open_process(pid: u32, desired_access: DWORD) -> Result<HANDLE, SystemError> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if !handle.is_null() {
        return Ok(handle);
    }
    let os_error = std::io::Error::last_os_error();
    if os_error.raw_os_error() == Some(ERROR_ACCESS_DENIED) {
        Err(SystemError::access_denied(format!(
            "OpenProcess({pid}): {os_error}"
        )))
    } else {
        Err(SystemError::operation_failed(format!(
            "OpenProcess({pid}): {os_error}"
        )))
    }
}

/// Copies target memory into `buf`, returning the bytes transferred.
///
/// A failing call can still transfer a prefix (`ERROR_PARTIAL_COPY`); the
/// reported count is returned either way.
pub unsafe fn read_process_memory(handle: HANDLE, address: Address, buf: &mut [u8]) -> usize {
    let mut transferred = 0usize;
    ReadProcessMemory(
        handle,
        address.as_usize() as LPVOID,
        buf.as_mut_ptr() as LPVOID,
        buf.len(),
        &mut transferred,
    );
    transferred
}

/// Copies `data` into target memory, returning the bytes transferred
pub unsafe fn write_process_memory(handle: HANDLE, address: Address, data: &[u8]) -> usize {
    let mut transferred = 0usize;
    WriteProcessMemory(
        handle,
        address.as_usize() as LPVOID,
        data.as_ptr() as LPVOID,
        data.len(),
        &mut transferred,
    );
    transferred
}

/// Commits pages in the target, returning the mapped base
pub unsafe fn virtual_alloc_ex(
    handle: HANDLE,
    preferred: Option<Address>,
    size: usize,
    protection: Protection,
) -> Option<Address> {
    let wanted = preferred.map_or(std::ptr::null_mut(), |a| a.as_usize() as LPVOID);
    let base = VirtualAllocEx(
        handle,
        wanted,
        size,
        MEM_COMMIT | MEM_RESERVE,
        protection_to_native(protection),
    );
    if base.is_null() {
        None
    } else {
        Some(Address::new(base as usize))
    }
}

/// Releases an allocation made by [`virtual_alloc_ex`].
///
/// `MEM_RELEASE` frees the whole original allocation; the size argument to
/// the caller is accepted for interface symmetry but not forwarded.
pub unsafe fn virtual_free_ex(handle: HANDLE, address: Address) -> bool {
    VirtualFreeEx(handle, address.as_usize() as LPVOID, 0, MEM_RELEASE) != FALSE
}

/// Changes page protection over a span
pub unsafe fn virtual_protect_ex(
    handle: HANDLE,
    address: Address,
    size: usize,
    protection: Protection,
) -> bool {
    let mut previous: DWORD = 0;
    VirtualProtectEx(
        handle,
        address.as_usize() as LPVOID,
        size,
        protection_to_native(protection),
        &mut previous,
    ) != FALSE
}

/// Queries the region containing `address`
pub unsafe fn virtual_query_ex(
    handle: HANDLE,
    address: Address,
) -> Option<MEMORY_BASIC_INFORMATION> {
    let mut info: MEMORY_BASIC_INFORMATION = mem::zeroed();
    let written = VirtualQueryEx(
        handle,
        address.as_usize() as LPVOID,
        &mut info,
        mem::size_of::<MEMORY_BASIC_INFORMATION>(),
    );
    if written == 0 {
        None
    } else {
        Some(info)
    }
}

/// Translates a protection state to its `PAGE_*` flag word
pub fn protection_to_native(protection: Protection) -> DWORD {
    match protection {
        Protection::None => PAGE_NOACCESS,
        Protection::Read => PAGE_READONLY,
        Protection::Execute => PAGE_EXECUTE,
        Protection::ReadWrite => PAGE_READWRITE,
        Protection::ReadExecute => PAGE_EXECUTE_READ,
        Protection::ReadWriteExecute => PAGE_EXECUTE_READWRITE,
    }
}

/// Translates a `PAGE_*` flag word back, dropping guard/cache modifiers.
/// Copy-on-write protections land on their plain-write counterparts.
pub fn protection_from_native(value: DWORD) -> Option<Protection> {
    match value & 0xFF {
        PAGE_NOACCESS => Some(Protection::None),
        PAGE_READONLY => Some(Protection::Read),
        PAGE_READWRITE | PAGE_WRITECOPY => Some(Protection::ReadWrite),
        PAGE_EXECUTE => Some(Protection::Execute),
        PAGE_EXECUTE_READ => Some(Protection::ReadExecute),
        PAGE_EXECUTE_READWRITE | PAGE_EXECUTE_WRITECOPY => Some(Protection::ReadWriteExecute),
        _ => None,
    }
}
