//! Absolute address wrapper with hex parsing and alignment helpers

use super::error::SystemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An absolute address in some process's address space.
///
/// Arithmetic on addresses wraps around the machine word; callers that need
/// saturating or checked behaviour do it on the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub usize);

impl Address {
    /// Wraps a raw address value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// The zero address
    pub const fn null() -> Self {
        Address(0)
    }

    /// Whether this is the zero address
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Whether the address sits on an `alignment` boundary. Zero alignment
    /// is answered with `false`, never divided by.
    pub const fn is_aligned(&self, alignment: usize) -> bool {
        alignment != 0 && self.0 % alignment == 0
    }

    /// Snaps the address down to the enclosing power-of-two boundary; zero
    /// alignment is a no-op
    pub const fn align_down(&self, alignment: usize) -> Self {
        if alignment == 0 {
            return *self;
        }
        Address(self.0 & !(alignment - 1))
    }

    /// Snaps the address up to the next power-of-two boundary, saturating
    /// at the top of the address space; zero alignment is a no-op
    pub const fn align_up(&self, alignment: usize) -> Self {
        if alignment == 0 {
            return *self;
        }
        Address(self.0.saturating_add(alignment - 1) & !(alignment - 1))
    }

    /// Adds a signed offset to the address, wrapping on overflow
    pub const fn offset(&self, offset: isize) -> Self {
        Address(self.0.wrapping_add_signed(offset))
    }

    /// Adds an unsigned offset, wrapping on overflow
    pub const fn wrapping_add(&self, count: usize) -> Self {
        Address(self.0.wrapping_add(count))
    }

    /// Subtracts an unsigned offset, wrapping on underflow
    pub const fn wrapping_sub(&self, count: usize) -> Self {
        Address(self.0.wrapping_sub(count))
    }

    /// The raw integer value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// The address as a const pointer; no validity is implied
    pub const fn as_ptr<T>(&self) -> *const T {
        self.0 as *const T
    }

    /// The address as a mutable pointer; no validity is implied
    pub const fn as_mut_ptr<T>(&self) -> *mut T {
        self.0 as *mut T
    }
}

impl FromStr for Address {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let prefixed = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .or_else(|| trimmed.strip_prefix('$'));

        let parsed = match prefixed {
            Some(digits) => usize::from_str_radix(digits, 16),
            // Unprefixed input with a letter in it can only be hex.
            None if trimmed.bytes().any(|b| b.is_ascii_alphabetic()) => {
                usize::from_str_radix(trimmed, 16)
            }
            // Bare digits are ambiguous; decimal wins, hex is the fallback.
            None => trimmed
                .parse::<usize>()
                .or_else(|_| usize::from_str_radix(trimmed, 16)),
        };

        parsed
            .map(Address::new)
            .map_err(|_| SystemError::OperationFailed(format!("invalid address: {trimmed}")))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value as usize)
    }
}

impl From<*const u8> for Address {
    fn from(ptr: *const u8) -> Self {
        Address::new(ptr as usize)
    }
}

impl From<*mut u8> for Address {
    fn from(ptr: *mut u8) -> Self {
        Address::new(ptr as usize)
    }
}
