//! Scanners yielding signature hits over byte buffers

use super::compiled::Pattern;
use crate::memory::{MemView, RawPointer};

/// Yields every offset in a buffer where a pattern matches.
///
/// The scan is the naive O(n·m) comparison: each candidate start index is
/// tried in order and the cursor advances by one whether it matched or not,
/// so overlapping matches are all reported. The iterator is single-pass;
/// construct a fresh one to restart.
///
/// An empty pattern matches at every candidate index the bound admits,
/// which for an `n`-byte buffer is `0..=n`.
#[derive(Debug)]
pub struct PatternIterator<'a> {
    pattern: &'a Pattern,
    buffer: &'a [u8],
    cursor: usize,
}

impl<'a> PatternIterator<'a> {
    /// Creates a scanner over a materialised buffer
    pub fn new(pattern: &'a Pattern, buffer: &'a [u8]) -> Self {
        PatternIterator {
            pattern,
            buffer,
            cursor: 0,
        }
    }
}

impl Iterator for PatternIterator<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let m = self.pattern.len();
        let n = self.buffer.len();
        if m > n {
            return None;
        }
        // Last admissible start offset is n - m, inclusive.
        while self.cursor <= n - m {
            let candidate = self.cursor;
            self.cursor += 1;
            if self.pattern.matches(&self.buffer[candidate..]) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Adapter mapping scan offsets to absolute pointers.
///
/// Wraps a [`PatternIterator`] and a base pointer; each yielded offset `o`
/// becomes `base + o` on the base's view. Lazy: the underlying scan runs
/// one step per `next()`.
#[derive(Debug)]
pub struct PointerPatternIterator<'v, 'buf, V: MemView> {
    offsets: PatternIterator<'buf>,
    base: RawPointer<'v, V>,
}

impl<'v, 'buf, V: MemView> PointerPatternIterator<'v, 'buf, V> {
    /// Anchors a byte-offset scanner to a base pointer
    pub fn new(offsets: PatternIterator<'buf>, base: RawPointer<'v, V>) -> Self {
        PointerPatternIterator { offsets, base }
    }
}

impl<'v, V: MemView> Iterator for PointerPatternIterator<'v, '_, V> {
    type Item = RawPointer<'v, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.offsets.next().map(|offset| self.base + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(signature: &str, buffer: &[u8]) -> Vec<usize> {
        let pattern = Pattern::parse(signature).unwrap();
        PatternIterator::new(&pattern, buffer).collect()
    }

    #[test]
    fn test_simple_match() {
        assert_eq!(offsets("22 33", &[0x11, 0x22, 0x33, 0x22, 0x33]), [1, 3]);
    }

    #[test]
    fn test_overlapping_matches() {
        assert_eq!(offsets("AA AA", &[0xAA, 0xAA, 0xAA]), [0, 1]);
    }

    #[test]
    fn test_all_wildcards_overlap() {
        assert_eq!(offsets("?? ??", &[0x01, 0x02, 0x03]), [0, 1]);
    }

    #[test]
    fn test_wildcard_in_middle() {
        assert_eq!(offsets("AA ?? CC", &[0xAA, 0xBB, 0xCC]), [0]);
        assert_eq!(offsets("AA ?? CC", &[0xAA, 0x7F, 0xCC]), [0]);
        assert_eq!(offsets("AA ?? CC", &[0xAA, 0xBB, 0xCD]), [] as [usize; 0]);
    }

    #[test]
    fn test_pattern_longer_than_buffer() {
        assert_eq!(offsets("AA BB CC DD", &[0xAA, 0xBB]), [] as [usize; 0]);
        assert_eq!(offsets("AA", &[]), [] as [usize; 0]);
    }

    #[test]
    fn test_exact_length_match() {
        assert_eq!(offsets("AA BB", &[0xAA, 0xBB]), [0]);
    }

    #[test]
    fn test_empty_pattern_policy() {
        // Every admissible start offset, one past the last byte included.
        assert_eq!(offsets("", &[0x01, 0x02, 0x03]), [0, 1, 2, 3]);
        assert_eq!(offsets("", &[]), [0]);
    }

    #[test]
    fn test_single_pass() {
        let pattern = Pattern::parse("AA").unwrap();
        let buffer = [0xAA, 0xAA];
        let mut iter = PatternIterator::new(&pattern, &buffer);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
