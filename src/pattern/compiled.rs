//! Compiled byte signatures

use super::lexer::{PatternLexer, Token};
use crate::core::types::PatternError;
use std::fmt;
use std::str::FromStr;

/// A compiled signature: an ordered sequence of optional bytes where `None`
/// matches any byte.
///
/// Patterns are immutable once constructed; equality and hashing are
/// structural over the sequence. The empty pattern is legal and matches at
/// every candidate offset a buffer admits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bytes: Vec<Option<u8>>,
}

impl Pattern {
    /// Creates a pattern from an already-compiled sequence
    pub fn new(bytes: Vec<Option<u8>>) -> Self {
        Pattern { bytes }
    }

    /// Parses a signature string such as `"48 8B ?? E8"`
    pub fn parse(signature: &str) -> Result<Self, PatternError> {
        let mut lexer = PatternLexer::new(signature);
        let mut bytes = Vec::new();
        loop {
            match lexer.next_token()? {
                Token::Byte(value) => bytes.push(Some(value)),
                Token::Wildcard => bytes.push(None),
                Token::EndOfLine => return Ok(Pattern { bytes }),
            }
        }
    }

    /// Number of elements (literal bytes and wildcards)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the pattern has no elements
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The underlying element sequence
    pub fn bytes(&self) -> &[Option<u8>] {
        &self.bytes
    }

    /// Whether the pattern matches at the start of `window`.
    ///
    /// `window` must hold at least `len()` bytes for a match to be
    /// possible; a shorter window never matches a non-empty pattern.
    pub fn matches(&self, window: &[u8]) -> bool {
        if window.len() < self.bytes.len() {
            return false;
        }
        self.bytes
            .iter()
            .zip(window)
            .all(|(expected, actual)| match expected {
                Some(byte) => byte == actual,
                None => true,
            })
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match element {
                Some(byte) => write!(f, "{:02X}", byte)?,
                None => f.write_str("??")?,
            }
        }
        Ok(())
    }
}
