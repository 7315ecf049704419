//! Raw absolute pointers over a view

use super::encoding::Encoding;
use super::pod::Pod;
use super::range::MemRange;
use super::typed::TypedPointer;
use super::view::MemView;
use crate::core::types::Address;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

/// An absolute address paired with the view it is read through.
///
/// The pointer owns no memory. Identity is the address alone: two pointers
/// over different views at the same address compare equal. Arithmetic
/// wraps around the machine word.
pub struct RawPointer<'a, V: MemView> {
    view: &'a V,
    address: Address,
}

impl<'a, V: MemView> RawPointer<'a, V> {
    /// Creates a pointer at `address` on `view`
    pub fn new(view: &'a V, address: Address) -> Self {
        RawPointer { view, address }
    }

    /// The absolute address
    pub fn address(&self) -> Address {
        self.address
    }

    /// The backing view
    pub fn view(&self) -> &'a V {
        self.view
    }

    /// Whether the address is null
    pub fn is_null(&self) -> bool {
        self.address.is_null()
    }

    /// A pointer displaced by a signed byte offset, wrapping on overflow
    pub fn offset(&self, offset: isize) -> Self {
        RawPointer {
            view: self.view,
            address: self.address.offset(offset),
        }
    }

    /// Reads bytes at the pointer, returning the count copied
    pub fn read(&self, buf: &mut [u8]) -> usize {
        self.view.read(self.address, buf)
    }

    /// Writes bytes at the pointer, returning the count written
    pub fn write(&self, data: &[u8]) -> usize {
        self.view.write(self.address, data)
    }

    /// Reads one POD value at the pointer
    pub fn read_value<T: Pod>(&self) -> Option<T> {
        self.view.read_value(self.address)
    }

    /// Writes one POD value at the pointer
    pub fn write_value<T: Pod>(&self, value: T) -> bool {
        self.view.write_value(self.address, value)
    }

    /// Reads up to `max_count` POD values starting at the pointer
    pub fn read_array<T: Pod>(&self, max_count: usize) -> Vec<T> {
        self.view.read_array(self.address, max_count)
    }

    /// Writes a sequence of POD values starting at the pointer
    pub fn write_array<T: Pod>(&self, values: &[T]) -> usize {
        self.view.write_array(self.address, values)
    }

    /// Reads a string at the pointer under encoding `E`
    pub fn read_string<E: Encoding>(&self, max_chars: usize, zero_terminated: bool) -> String {
        self.view
            .read_string::<E>(self.address, max_chars, zero_terminated)
    }

    /// Writes a string at the pointer under encoding `E`
    pub fn write_string<E: Encoding>(&self, s: &str, zero_terminated: bool) -> bool {
        self.view
            .write_string::<E>(self.address, s, zero_terminated)
    }

    /// Follows the native-width address stored at the pointer
    pub fn deref(&self) -> Option<RawPointer<'a, V>> {
        let target = self.view.read_value::<usize>(self.address)?;
        Some(RawPointer {
            view: self.view,
            address: Address::new(target),
        })
    }

    /// Reinterprets the pointer with a POD payload type
    pub fn typed<T: Pod>(&self) -> TypedPointer<'a, V, T> {
        TypedPointer::new(self.view, self.address)
    }

    /// The range `[self, self + size)`
    pub fn to_range(&self, size: usize) -> MemRange<'a, V> {
        MemRange::new(self.view, self.address, size)
    }

    /// The range `[self, end)`, or `None` when `end` lies before `self`
    pub fn range_to(&self, end: RawPointer<'a, V>) -> Option<MemRange<'a, V>> {
        if end.address < self.address {
            return None;
        }
        Some(MemRange::new(
            self.view,
            self.address,
            end.address.as_usize() - self.address.as_usize(),
        ))
    }

    /// Hands the pointer to any single-argument constructor, so domain
    /// types can offer a uniform from-pointer conversion without a common
    /// base.
    pub fn to<R>(self, f: impl FnOnce(Self) -> R) -> R {
        f(self)
    }
}

impl<V: MemView> Clone for RawPointer<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: MemView> Copy for RawPointer<'_, V> {}

impl<V: MemView> PartialEq for RawPointer<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<V: MemView> Eq for RawPointer<'_, V> {}

impl<V: MemView> PartialOrd for RawPointer<'_, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: MemView> Ord for RawPointer<'_, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.address)
    }
}

impl<V: MemView> Hash for RawPointer<'_, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl<V: MemView> Add<usize> for RawPointer<'_, V> {
    type Output = Self;

    fn add(self, count: usize) -> Self {
        RawPointer {
            view: self.view,
            address: self.address.wrapping_add(count),
        }
    }
}

impl<V: MemView> Sub<usize> for RawPointer<'_, V> {
    type Output = Self;

    fn sub(self, count: usize) -> Self {
        RawPointer {
            view: self.view,
            address: self.address.wrapping_sub(count),
        }
    }
}

impl<V: MemView> fmt::Debug for RawPointer<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPointer").field(&self.address).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::local::LocalView;

    #[test]
    fn test_identity_is_address_only() {
        let view = LocalView::new();
        let other = LocalView::new();
        let a = view.ptr(Address::new(0x1000));
        let b = other.ptr(Address::new(0x1000));
        let c = view.ptr(Address::new(0x2000));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn test_arithmetic_wraps() {
        let view = LocalView::new();
        let p = view.ptr(Address::new(usize::MAX));
        assert_eq!((p + 1).address(), Address::null());
        assert_eq!((view.ptr(Address::null()) - 1).address(), Address::new(usize::MAX));
        assert_eq!(p.offset(1).address(), Address::null());
    }

    #[test]
    fn test_range_construction() {
        let view = LocalView::new();
        let begin = view.ptr(Address::new(0x1000));
        let end = view.ptr(Address::new(0x1800));

        let range = begin.to_range(0x800);
        assert_eq!(range.base(), Address::new(0x1000));
        assert_eq!(range.size(), 0x800);

        let range = begin.range_to(end).unwrap();
        assert_eq!(range.size(), 0x800);

        assert!(end.range_to(begin).is_none());
        assert_eq!(begin.range_to(begin).unwrap().size(), 0);
    }

    #[test]
    fn test_to_conversion_hook() {
        struct Health(Address);

        let view = LocalView::new();
        let health = view.ptr(Address::new(0x40)).to(|p| Health(p.address()));
        assert_eq!(health.0, Address::new(0x40));
    }

    #[test]
    fn test_hash_follows_address() {
        use std::collections::HashSet;

        let view = LocalView::new();
        let mut set = HashSet::new();
        set.insert(view.ptr(Address::new(1)));
        set.insert(view.ptr(Address::new(1)));
        set.insert(view.ptr(Address::new(2)));
        assert_eq!(set.len(), 2);
    }
}
