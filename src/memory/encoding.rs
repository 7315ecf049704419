//! String encodings for reading and writing target memory
//!
//! Decoding never fails: malformed sequences are replaced with U+FFFD, the
//! same lossy policy as `String::from_utf8_lossy`. Code units are
//! native-endian, matching what the target process holds in memory.

/// A string encoding usable with `read_string`/`write_string`.
pub trait Encoding {
    /// Width in bytes of one code unit
    const UNIT_WIDTH: usize;

    /// Upper bound of code units needed for one character
    const MAX_UNITS_PER_CHAR: usize;

    /// Decodes bytes into a string, replacing malformed sequences
    fn decode(bytes: &[u8]) -> String;

    /// Encodes a string into code-unit bytes
    fn encode(s: &str) -> Vec<u8>;
}

/// UTF-8: one-byte units, up to four per character
pub struct Utf8;

impl Encoding for Utf8 {
    const UNIT_WIDTH: usize = 1;
    const MAX_UNITS_PER_CHAR: usize = 4;

    fn decode(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn encode(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }
}

/// UTF-16 in native byte order: two-byte units, up to two per character
pub struct Utf16;

impl Encoding for Utf16 {
    const UNIT_WIDTH: usize = 2;
    const MAX_UNITS_PER_CHAR: usize = 2;

    fn decode(bytes: &[u8]) -> String {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    }

    fn encode(s: &str) -> Vec<u8> {
        s.encode_utf16()
            .flat_map(|unit| unit.to_ne_bytes())
            .collect()
    }
}

/// UTF-32 in native byte order: four-byte units, one per character
pub struct Utf32;

impl Encoding for Utf32 {
    const UNIT_WIDTH: usize = 4;
    const MAX_UNITS_PER_CHAR: usize = 1;

    fn decode(bytes: &[u8]) -> String {
        bytes
            .chunks_exact(4)
            .map(|quad| {
                let value = u32::from_ne_bytes([quad[0], quad[1], quad[2], quad[3]]);
                char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
            })
            .collect()
    }

    fn encode(s: &str) -> Vec<u8> {
        s.chars().flat_map(|c| (c as u32).to_ne_bytes()).collect()
    }
}

/// Truncates decoded bytes at the first zero code unit of the encoding.
pub(crate) fn truncate_at_zero_unit(bytes: &[u8], unit_width: usize) -> &[u8] {
    if unit_width == 0 {
        return bytes;
    }
    for (i, unit) in bytes.chunks_exact(unit_width).enumerate() {
        if unit.iter().all(|&b| b == 0) {
            return &bytes[..i * unit_width];
        }
    }
    bytes
}
