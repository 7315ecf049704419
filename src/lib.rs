//! Cross-platform process memory inspection and manipulation
//!
//! memscope gives programs one surface for working with the address space
//! of the current process or a foreign one:
//!
//! - **Views** — [`MemView`] is the capability backing every operation;
//!   [`LocalView`] is the in-process shortcut and [`ProcessView`] the
//!   OS-mediated foreign-process backend (Win32, Mach or Linux vm
//!   syscalls, chosen at compile time).
//! - **Pointers** — [`RawPointer`] and [`TypedPointer`] compose pointer
//!   arithmetic, POD loads and stores, string transcoding and pointer
//!   chasing over any view.
//! - **Signatures** — IDA-style patterns (`"48 8B ?? E8"`) compiled by
//!   [`Pattern`] and scanned over [`MemRange`]s, yielding absolute
//!   pointers to hits.
//!
//! ```no_run
//! use memscope::{LocalView, MemView, Protection};
//!
//! let view = LocalView::new();
//! let scratch = view.allocate(None, 64, Protection::ReadWrite).unwrap();
//! view.write_value(scratch.base(), 0xDEAD_BEEFu32);
//! assert_eq!(view.read_value::<u32>(scratch.base()), Some(0xDEAD_BEEF));
//!
//! let hit = scratch.find_signature("EF BE AD DE").unwrap();
//! assert_eq!(hit.unwrap().address(), scratch.base());
//! ```

pub mod core;
pub mod memory;
pub mod os;
pub mod pattern;
pub mod platform;

pub use crate::core::types::{
    Address, Architecture, OsProcess, PatternError, ProcessId, ProcessModule, Protection,
    SystemError,
};
pub use memory::{
    Encoding, LocalView, MemRange, MemView, Pod, Ptr, RawPointer, TypedPointer, Utf16, Utf32, Utf8,
};
pub use os::ProcessView;
pub use pattern::{Pattern, PatternIterator, PatternLexer, PointerPatternIterator, Token};
