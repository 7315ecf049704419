//! Typed pointers over a view

use super::pod::{Pod, Ptr};
use super::pointer::RawPointer;
use super::view::MemView;
use crate::core::types::Address;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, Sub};

/// A [`RawPointer`] specialised to a POD payload type.
///
/// Identity and ordering follow the address, like the raw form. Arithmetic
/// is by **byte offset**, not by `T`-stride: `p + 4` moves four bytes, not
/// four elements.
pub struct TypedPointer<'a, V: MemView, T: Pod> {
    raw: RawPointer<'a, V>,
    _payload: PhantomData<fn() -> T>,
}

impl<'a, V: MemView, T: Pod> TypedPointer<'a, V, T> {
    /// Creates a typed pointer at `address` on `view`
    pub fn new(view: &'a V, address: Address) -> Self {
        TypedPointer {
            raw: RawPointer::new(view, address),
            _payload: PhantomData,
        }
    }

    /// The absolute address
    pub fn address(&self) -> Address {
        self.raw.address()
    }

    /// The backing view
    pub fn view(&self) -> &'a V {
        self.raw.view()
    }

    /// Whether the address is null
    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// The untyped form of this pointer
    pub fn raw(&self) -> RawPointer<'a, V> {
        self.raw
    }

    /// Size in bytes of the payload type
    pub const fn stride() -> usize {
        std::mem::size_of::<T>()
    }

    /// Reads the pointee, or `None` unless every byte was readable
    pub fn deref(&self) -> Option<T> {
        self.raw.read_value()
    }

    /// Writes the pointee; `true` iff every byte was written
    pub fn write(&self, value: T) -> bool {
        self.raw.write_value(value)
    }

    /// Reads up to `max_count` consecutive payloads starting here
    pub fn read_array(&self, max_count: usize) -> Vec<T> {
        self.raw.read_array(max_count)
    }

    /// Writes consecutive payloads starting here, returning the count
    /// landed
    pub fn write_array(&self, values: &[T]) -> usize {
        self.raw.write_array(values)
    }

    /// A pointer displaced by a signed byte offset, wrapping on overflow
    pub fn offset(&self, offset: isize) -> Self {
        TypedPointer {
            raw: self.raw.offset(offset),
            _payload: PhantomData,
        }
    }

    /// A pointer to element `index`, i.e. displaced by whole strides
    pub fn element(&self, index: usize) -> Self {
        TypedPointer {
            raw: self.raw + index.wrapping_mul(Self::stride()),
            _payload: PhantomData,
        }
    }

    /// Reinterprets the payload type in place
    pub fn cast<U: Pod>(&self) -> TypedPointer<'a, V, U> {
        TypedPointer {
            raw: self.raw,
            _payload: PhantomData,
        }
    }
}

impl<'a, V: MemView, T: Pod> TypedPointer<'a, V, Ptr<T>> {
    /// Walks one level of indirection: reads the stored address and
    /// reattaches the same view, so chains resolve without restating the
    /// view at each step.
    pub fn deref_ptr(&self) -> Option<TypedPointer<'a, V, T>> {
        let cell = self.deref()?;
        Some(TypedPointer::new(
            self.raw.view(),
            Address::new(cell.address()),
        ))
    }
}

impl<V: MemView, T: Pod> Clone for TypedPointer<'_, V, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: MemView, T: Pod> Copy for TypedPointer<'_, V, T> {}

impl<V: MemView, T: Pod> PartialEq for TypedPointer<'_, V, T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<V: MemView, T: Pod> Eq for TypedPointer<'_, V, T> {}

impl<V: MemView, T: Pod> PartialOrd for TypedPointer<'_, V, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: MemView, T: Pod> Ord for TypedPointer<'_, V, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<V: MemView, T: Pod> Hash for TypedPointer<'_, V, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<V: MemView, T: Pod> Add<usize> for TypedPointer<'_, V, T> {
    type Output = Self;

    // Byte offset, not element stride.
    fn add(self, count: usize) -> Self {
        TypedPointer {
            raw: self.raw + count,
            _payload: PhantomData,
        }
    }
}

impl<V: MemView, T: Pod> Sub<usize> for TypedPointer<'_, V, T> {
    type Output = Self;

    fn sub(self, count: usize) -> Self {
        TypedPointer {
            raw: self.raw - count,
            _payload: PhantomData,
        }
    }
}

impl<V: MemView, T: Pod> fmt::Debug for TypedPointer<'_, V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedPointer")
            .field(&self.raw.address())
            .field(&std::any::type_name::<T>())
            .finish()
    }
}
