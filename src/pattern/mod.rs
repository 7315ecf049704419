//! Byte-signature compilation and scanning
//!
//! A signature string is tokenized by [`PatternLexer`], compiled into a
//! [`Pattern`] of optional bytes, and matched over materialised buffers by
//! [`PatternIterator`]. [`PointerPatternIterator`] re-anchors hit offsets
//! to absolute pointers on a memory view.

mod compiled;
mod iterator;
mod lexer;

pub use compiled::Pattern;
pub use iterator::{PatternIterator, PointerPatternIterator};
pub use lexer::{PatternLexer, Token};
