//! Host platform parameters: page size, alignment, architecture

use crate::core::types::{Address, Architecture};
use once_cell::sync::Lazy;

static PAGE_SIZE: Lazy<usize> = Lazy::new(query_page_size);

/// Size in bytes of a virtual memory page on this host
pub fn page_size() -> usize {
    *PAGE_SIZE
}

/// Rounds an address down to the containing page boundary
pub fn align_start(address: Address) -> Address {
    address.align_down(page_size())
}

/// Rounds an address up to the next page boundary, saturating at the top
/// of the address space
pub fn align_end(address: Address) -> Address {
    address.align_up(page_size())
}

/// Architecture the current process runs as
pub fn architecture() -> Architecture {
    match std::env::consts::ARCH {
        "x86" => Architecture::X86,
        "x86_64" => Architecture::X86_64,
        "arm" => Architecture::Arm,
        "aarch64" => Architecture::Arm64,
        _ => Architecture::Unknown,
    }
}

#[cfg(unix)]
fn query_page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size <= 0 {
        4096
    } else {
        size as usize
    }
}

#[cfg(windows)]
fn query_page_size() -> usize {
    use std::mem;
    use winapi::um::sysinfoapi::{GetSystemInfo, SYSTEM_INFO};

    let mut info: SYSTEM_INFO = unsafe { mem::zeroed() };
    unsafe { GetSystemInfo(&mut info) };
    if info.dwPageSize == 0 {
        4096
    } else {
        info.dwPageSize as usize
    }
}
