//! The memory-view capability
//!
//! [`MemView`] is the seam between portable logic and OS backends. A
//! backend implements the six primitives; everything else — typed loads and
//! stores, arrays, strings, pointer reattachment, range construction — is
//! provided once here and works against any backend.

use super::encoding::{truncate_at_zero_unit, Encoding};
use super::pod::Pod;
use super::pointer::RawPointer;
use super::range::MemRange;
use super::typed::TypedPointer;
use crate::core::types::{Address, ProcessModule, Protection};
use std::mem;
use std::ptr;
use std::slice;

/// Clamps a span length so `address + len` cannot overflow the machine
/// word. Backends apply this before issuing OS calls.
pub(crate) fn clamp_span(address: Address, len: usize) -> usize {
    len.min(usize::MAX - address.as_usize())
}

/// Read/write/allocate access to some address space.
///
/// Memory operations never return `Result`: reads and writes report the
/// byte count actually transferred (possibly less than requested, possibly
/// zero), allocation reports `None` on failure, protection changes report
/// `false`. Pages coming and going is not exceptional in this domain, and
/// the caller decides whether a partial outcome is worth retrying.
///
/// A view is not inherently shareable across threads: the embedded OS
/// handle or port is used without synchronisation. Construct one view per
/// thread, or serialise access externally.
pub trait MemView {
    /// Copies bytes at `address` into `buf`, returning the count copied.
    ///
    /// Backends attempt a single bulk copy and degrade to page-by-page
    /// copies on failure, accumulating bytes up to the first unreadable
    /// page. The requested span is clamped so `address + buf.len()` never
    /// overflows.
    fn read(&self, address: Address, buf: &mut [u8]) -> usize;

    /// Copies `data` to `address`, returning the count written.
    fn write(&self, address: Address, data: &[u8]) -> usize;

    /// Maps fresh pages, preferably at `preferred`, returning the mapped
    /// range or `None`.
    ///
    /// `size` is rounded up to a whole number of pages. The preferred
    /// address is a hint; the backend may place the mapping elsewhere. If
    /// any step fails the backend releases anything partially mapped.
    fn allocate(
        &self,
        preferred: Option<Address>,
        size: usize,
        protection: Protection,
    ) -> Option<MemRange<'_, Self>>
    where
        Self: Sized;

    /// Unmaps pages previously returned by [`allocate`](Self::allocate).
    ///
    /// Platform note: on Windows the whole original allocation is released
    /// regardless of `size`.
    fn free(&self, address: Address, size: usize) -> bool;

    /// Changes the protection of the pages spanning `[address, address+size)`.
    fn protect(&self, address: Address, size: usize, protection: Protection) -> bool;

    /// Returns the protection of the region containing `address`.
    fn protection(&self, address: Address) -> Option<Protection>;

    // ---- derived surface, provided for every backend ----

    /// Reads one POD value; `None` unless every byte was readable.
    fn read_value<T: Pod>(&self, address: Address) -> Option<T> {
        let size = mem::size_of::<T>();
        let mut buf = vec![0u8; size];
        if self.read(address, &mut buf) != size {
            return None;
        }
        Some(unsafe { ptr::read_unaligned(buf.as_ptr().cast()) })
    }

    /// Writes one POD value; `true` iff every byte was written.
    fn write_value<T: Pod>(&self, address: Address, value: T) -> bool {
        let bytes = unsafe {
            slice::from_raw_parts(&value as *const T as *const u8, mem::size_of::<T>())
        };
        self.write(address, bytes) == bytes.len()
    }

    /// Reads up to `max_count` contiguous POD values, trimmed to the
    /// whole values actually read. A zero-sized `T` yields an empty
    /// result.
    fn read_array<T: Pod>(&self, address: Address, max_count: usize) -> Vec<T> {
        let stride = mem::size_of::<T>();
        if stride == 0 {
            return Vec::new();
        }
        let Some(capacity) = max_count.checked_mul(stride) else {
            return Vec::new();
        };
        let mut buf = vec![0u8; capacity];
        let read = self.read(address, &mut buf);
        let whole = (read / stride) * stride;
        buf[..whole]
            .chunks_exact(stride)
            .map(|chunk| unsafe { ptr::read_unaligned(chunk.as_ptr().cast()) })
            .collect()
    }

    /// Writes a contiguous sequence of POD values, returning how many
    /// whole values landed.
    fn write_array<T: Pod>(&self, address: Address, values: &[T]) -> usize {
        let stride = mem::size_of::<T>();
        if stride == 0 {
            return 0;
        }
        let bytes = unsafe {
            slice::from_raw_parts(values.as_ptr().cast::<u8>(), values.len() * stride)
        };
        self.write(address, bytes) / stride
    }

    /// Embellishes an address into a pointer on this view
    fn ptr(&self, address: Address) -> RawPointer<'_, Self>
    where
        Self: Sized,
    {
        RawPointer::new(self, address)
    }

    /// Embellishes an address into a typed pointer on this view
    fn typed_ptr<T: Pod>(&self, address: Address) -> TypedPointer<'_, Self, T>
    where
        Self: Sized,
    {
        TypedPointer::new(self, address)
    }

    /// Reads a native-width address and reattaches this view to it
    fn read_ptr(&self, address: Address) -> Option<RawPointer<'_, Self>>
    where
        Self: Sized,
    {
        self.read_value::<usize>(address)
            .map(|target| self.ptr(Address::new(target)))
    }

    /// Reads an array of native-width addresses as pointers on this view
    fn read_ptr_array(&self, address: Address, max_count: usize) -> Vec<RawPointer<'_, Self>>
    where
        Self: Sized,
    {
        self.read_array::<usize>(address, max_count)
            .into_iter()
            .map(|target| self.ptr(Address::new(target)))
            .collect()
    }

    /// Serialises pointers as native-width addresses, returning how many
    /// landed
    fn write_ptr_array(&self, address: Address, pointers: &[RawPointer<'_, Self>]) -> usize
    where
        Self: Sized,
    {
        let addresses: Vec<usize> = pointers.iter().map(|p| p.address().as_usize()).collect();
        self.write_array(address, &addresses)
    }

    /// Reads a native-width address as a typed pointer on this view
    fn read_typed_ptr<T: Pod>(&self, address: Address) -> Option<TypedPointer<'_, Self, T>>
    where
        Self: Sized,
    {
        self.read_value::<usize>(address)
            .map(|target| self.typed_ptr(Address::new(target)))
    }

    /// Reads an array of native-width addresses as typed pointers
    fn read_typed_ptr_array<T: Pod>(
        &self,
        address: Address,
        max_count: usize,
    ) -> Vec<TypedPointer<'_, Self, T>>
    where
        Self: Sized,
    {
        self.read_array::<usize>(address, max_count)
            .into_iter()
            .map(|target| self.typed_ptr(Address::new(target)))
            .collect()
    }

    /// Serialises typed pointers as native-width addresses
    fn write_typed_ptr_array<T: Pod>(
        &self,
        address: Address,
        pointers: &[TypedPointer<'_, Self, T>],
    ) -> usize
    where
        Self: Sized,
    {
        let addresses: Vec<usize> = pointers.iter().map(|p| p.address().as_usize()).collect();
        self.write_array(address, &addresses)
    }

    /// Reads a string of at most `max_chars` characters under encoding `E`.
    ///
    /// Reads `max_chars` times the encoding's worst-case units per
    /// character, optionally truncates at the first zero code unit, decodes
    /// with replacement on error, and finally trims to `max_chars`
    /// characters.
    fn read_string<E: Encoding>(
        &self,
        address: Address,
        max_chars: usize,
        zero_terminated: bool,
    ) -> String {
        let Some(units) = max_chars.checked_mul(E::MAX_UNITS_PER_CHAR) else {
            return String::new();
        };
        let Some(byte_len) = units.checked_mul(E::UNIT_WIDTH) else {
            return String::new();
        };
        let mut buf = vec![0u8; byte_len];
        let read = self.read(address, &mut buf);
        buf.truncate(read);

        let bytes: &[u8] = if zero_terminated {
            truncate_at_zero_unit(&buf, E::UNIT_WIDTH)
        } else {
            &buf
        };
        let decoded = E::decode(bytes);
        if decoded.chars().count() > max_chars {
            decoded.chars().take(max_chars).collect()
        } else {
            decoded
        }
    }

    /// Writes a string under encoding `E`, optionally zero-terminated.
    ///
    /// UTF-8 input needs no transcoding; other encodings transcode with
    /// replacement on error. Returns `true` iff every byte was written.
    fn write_string<E: Encoding>(&self, address: Address, s: &str, zero_terminated: bool) -> bool {
        let mut bytes = E::encode(s);
        if zero_terminated {
            bytes.resize(bytes.len() + E::UNIT_WIDTH, 0);
        }
        self.write(address, &bytes) == bytes.len()
    }

    /// Embellishes an address span into a range on this view
    fn range(&self, address: Address, size: usize) -> MemRange<'_, Self>
    where
        Self: Sized,
    {
        MemRange::new(self, address, size)
    }

    /// The range spanned by a loaded module image
    fn module_range(&self, module: &ProcessModule) -> MemRange<'_, Self>
    where
        Self: Sized,
    {
        MemRange::new(self, module.base, module.size)
    }
}
