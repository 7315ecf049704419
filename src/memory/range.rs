//! Address ranges over a view, with signature search

use super::pointer::RawPointer;
use super::view::MemView;
use crate::core::types::{Address, PatternError};
use crate::pattern::{Pattern, PatternIterator};
use std::fmt;

/// The half-open span `[base, base + size)` of some view's address space.
///
/// The constructor clamps `size` so `base + size` cannot overflow. Note
/// one deliberate asymmetry: [`contains`](Self::contains) accepts the
/// upper bound itself (`addr <= base + size`), a convention inherited from
/// long-standing callers and pinned by test.
pub struct MemRange<'a, V: MemView> {
    view: &'a V,
    base: Address,
    size: usize,
}

impl<'a, V: MemView> MemRange<'a, V> {
    /// Creates a range, clamping `size` to what fits above `base`
    pub fn new(view: &'a V, base: Address, size: usize) -> Self {
        MemRange {
            view,
            base,
            size: size.min(usize::MAX - base.as_usize()),
        }
    }

    /// The backing view
    pub fn view(&self) -> &'a V {
        self.view
    }

    /// First address of the range
    pub fn base(&self) -> Address {
        self.base
    }

    /// Length of the range in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// One past the last address (`base + size`)
    pub fn end(&self) -> Address {
        Address::new(self.base.as_usize() + self.size)
    }

    /// Whether the range is empty
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Pointer to the first address
    pub fn begin(&self) -> RawPointer<'a, V> {
        RawPointer::new(self.view, self.base)
    }

    /// Whether a pointer falls inside the range. The upper bound is
    /// inclusive: `base + size` itself is accepted.
    pub fn contains(&self, ptr: RawPointer<'a, V>) -> bool {
        self.base <= ptr.address() && ptr.address() <= self.end()
    }

    /// Materialises the whole range into a contiguous buffer, trimmed to
    /// the bytes actually readable.
    pub fn read(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.size];
        let read = self.view.read(self.base, &mut buf);
        buf.truncate(read);
        buf
    }

    /// Scans the range, returning a pointer to every hit in order.
    ///
    /// Overlapping hits are all reported. Only the readable prefix of the
    /// range is searched.
    pub fn scan(&self, pattern: &Pattern) -> Vec<RawPointer<'a, V>> {
        let buffer = self.read();
        PatternIterator::new(pattern, &buffer)
            .map(|offset| self.begin() + offset)
            .collect()
    }

    /// Pointer to the first hit, or `None`
    pub fn find(&self, pattern: &Pattern) -> Option<RawPointer<'a, V>> {
        let buffer = self.read();
        let offset = PatternIterator::new(pattern, &buffer).next()?;
        Some(self.begin() + offset)
    }

    /// Compiles a signature string and scans for it
    pub fn scan_signature(&self, signature: &str) -> Result<Vec<RawPointer<'a, V>>, PatternError> {
        let pattern = Pattern::parse(signature)?;
        Ok(self.scan(&pattern))
    }

    /// Compiles a signature string and finds its first hit
    pub fn find_signature(
        &self,
        signature: &str,
    ) -> Result<Option<RawPointer<'a, V>>, PatternError> {
        let pattern = Pattern::parse(signature)?;
        Ok(self.find(&pattern))
    }
}

impl<V: MemView> Clone for MemRange<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: MemView> Copy for MemRange<'_, V> {}

impl<V: MemView> fmt::Debug for MemRange<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemRange")
            .field("base", &self.base)
            .field("size", &self.size)
            .finish()
    }
}
