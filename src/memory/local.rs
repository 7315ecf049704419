//! In-process memory view

use super::range::MemRange;
use super::view::{clamp_span, MemView};
use crate::core::types::{Address, Protection};
use crate::os::ProcessView;
use std::ptr;

/// View over the current process's own address space.
///
/// Reads and writes are plain in-process copies, with null-address and
/// empty-buffer short-circuits returning 0. The copy itself cannot observe
/// page protection, so reading an unmapped or protected address faults the
/// process; callers hold the same responsibility as with any raw pointer.
///
/// Allocation, freeing and protection have no memcpy shortcut; they
/// delegate to the OS-backed view constructed for the current process.
pub struct LocalView {
    system: ProcessView,
}

impl LocalView {
    /// Creates a view over the current process
    pub fn new() -> Self {
        LocalView {
            system: ProcessView::current(),
        }
    }

    /// The OS-backed view the allocation operations delegate to
    pub fn system(&self) -> &ProcessView {
        &self.system
    }
}

impl Default for LocalView {
    fn default() -> Self {
        LocalView::new()
    }
}

impl MemView for LocalView {
    fn read(&self, address: Address, buf: &mut [u8]) -> usize {
        if address.is_null() || buf.is_empty() {
            return 0;
        }
        let len = clamp_span(address, buf.len());
        unsafe {
            ptr::copy_nonoverlapping(address.as_ptr::<u8>(), buf.as_mut_ptr(), len);
        }
        len
    }

    fn write(&self, address: Address, data: &[u8]) -> usize {
        if address.is_null() || data.is_empty() {
            return 0;
        }
        let len = clamp_span(address, data.len());
        unsafe {
            ptr::copy_nonoverlapping(data.as_ptr(), address.as_mut_ptr::<u8>(), len);
        }
        len
    }

    fn allocate(
        &self,
        preferred: Option<Address>,
        size: usize,
        protection: Protection,
    ) -> Option<MemRange<'_, Self>> {
        let mapped = self.system.allocate(preferred, size, protection)?;
        Some(MemRange::new(self, mapped.base(), mapped.size()))
    }

    fn free(&self, address: Address, size: usize) -> bool {
        self.system.free(address, size)
    }

    fn protect(&self, address: Address, size: usize, protection: Protection) -> bool {
        self.system.protect(address, size, protection)
    }

    fn protection(&self, address: Address) -> Option<Protection> {
        self.system.protection(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_empty_short_circuit() {
        let view = LocalView::new();
        let mut buf = [0u8; 4];

        assert_eq!(view.read(Address::null(), &mut buf), 0);
        assert_eq!(view.write(Address::null(), &buf), 0);

        let valid = Address::from(buf.as_ptr());
        assert_eq!(view.read(valid, &mut []), 0);
        assert_eq!(view.write(valid, &[]), 0);
    }

    #[test]
    #[cfg_attr(miri, ignore = "reads through an integer-derived pointer")]
    fn test_read_write_round_trip() {
        let view = LocalView::new();
        let mut target = [0u8; 8];
        let address = Address::from(target.as_mut_ptr());

        assert_eq!(view.write(address, &[1, 2, 3, 4]), 4);
        let mut back = [0u8; 4];
        assert_eq!(view.read(address, &mut back), 4);
        assert_eq!(back, [1, 2, 3, 4]);
        assert_eq!(&target[..4], &[1, 2, 3, 4]);
    }

    #[test]
    #[cfg_attr(miri, ignore = "reads through an integer-derived pointer")]
    fn test_value_round_trip() {
        let view = LocalView::new();
        let mut cell: u64 = 0;
        let address = Address::from(&mut cell as *mut u64 as *mut u8);

        assert!(view.write_value(address, 0x0123_4567_89AB_CDEFu64));
        assert_eq!(view.read_value::<u64>(address), Some(0x0123_4567_89AB_CDEF));
        assert_eq!(cell, 0x0123_4567_89AB_CDEF);
    }
}
