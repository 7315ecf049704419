//! Memory protection states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Protection of a memory region, restricted to the six representable
/// read/write/execute combinations.
///
/// Write access always implies read access; `w`-without-`r` does not exist
/// in this model. Translation to and from each OS's native flag word lives
/// in the per-OS modules and is lossy only in the `w`-implies-`r`
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protection {
    /// No access
    None,
    /// Read-only
    Read,
    /// Execute-only
    Execute,
    /// Read and write
    ReadWrite,
    /// Read and execute
    ReadExecute,
    /// Read, write and execute
    ReadWriteExecute,
}

impl Protection {
    /// Check if the protection allows reading
    pub const fn is_readable(&self) -> bool {
        matches!(
            self,
            Protection::Read
                | Protection::ReadWrite
                | Protection::ReadExecute
                | Protection::ReadWriteExecute
        )
    }

    /// Check if the protection allows writing
    pub const fn is_writable(&self) -> bool {
        matches!(self, Protection::ReadWrite | Protection::ReadWriteExecute)
    }

    /// Check if the protection allows execution
    pub const fn is_executable(&self) -> bool {
        matches!(
            self,
            Protection::Execute | Protection::ReadExecute | Protection::ReadWriteExecute
        )
    }

    /// Builds the nearest representable protection from individual access
    /// bits. Write access pulls read access in with it.
    pub const fn from_bits(read: bool, write: bool, execute: bool) -> Self {
        match (read || write, write, execute) {
            (false, _, false) => Protection::None,
            (false, _, true) => Protection::Execute,
            (true, false, false) => Protection::Read,
            (true, false, true) => Protection::ReadExecute,
            (true, true, false) => Protection::ReadWrite,
            (true, true, true) => Protection::ReadWriteExecute,
        }
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Protection::None => "NOACCESS",
            Protection::Read => "R",
            Protection::Execute => "X",
            Protection::ReadWrite => "RW",
            Protection::ReadExecute => "RX",
            Protection::ReadWriteExecute => "RWX",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_queries() {
        assert!(!Protection::None.is_readable());
        assert!(!Protection::None.is_writable());
        assert!(!Protection::None.is_executable());

        assert!(Protection::Read.is_readable());
        assert!(!Protection::Read.is_writable());

        assert!(!Protection::Execute.is_readable());
        assert!(Protection::Execute.is_executable());

        assert!(Protection::ReadWrite.is_readable());
        assert!(Protection::ReadWrite.is_writable());
        assert!(!Protection::ReadWrite.is_executable());

        assert!(Protection::ReadExecute.is_readable());
        assert!(!Protection::ReadExecute.is_writable());
        assert!(Protection::ReadExecute.is_executable());

        assert!(Protection::ReadWriteExecute.is_readable());
        assert!(Protection::ReadWriteExecute.is_writable());
        assert!(Protection::ReadWriteExecute.is_executable());
    }

    #[test]
    fn test_write_implies_read() {
        // A write-only flag word has no exact representation; it lands on rw.
        assert_eq!(
            Protection::from_bits(false, true, false),
            Protection::ReadWrite
        );
        assert_eq!(
            Protection::from_bits(false, true, true),
            Protection::ReadWriteExecute
        );
    }

    #[test]
    fn test_from_bits_exact() {
        assert_eq!(Protection::from_bits(false, false, false), Protection::None);
        assert_eq!(Protection::from_bits(true, false, false), Protection::Read);
        assert_eq!(
            Protection::from_bits(false, false, true),
            Protection::Execute
        );
        assert_eq!(
            Protection::from_bits(true, true, false),
            Protection::ReadWrite
        );
        assert_eq!(
            Protection::from_bits(true, false, true),
            Protection::ReadExecute
        );
        assert_eq!(
            Protection::from_bits(true, true, true),
            Protection::ReadWriteExecute
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Protection::None), "NOACCESS");
        assert_eq!(format!("{}", Protection::Read), "R");
        assert_eq!(format!("{}", Protection::ReadWrite), "RW");
        assert_eq!(format!("{}", Protection::ReadExecute), "RX");
        assert_eq!(format!("{}", Protection::ReadWriteExecute), "RWX");
        assert_eq!(format!("{}", Protection::Execute), "X");
    }

    #[test]
    fn test_serialization() {
        let prot = Protection::ReadExecute;
        let json = serde_json::to_string(&prot).unwrap();
        let back: Protection = serde_json::from_str(&json).unwrap();
        assert_eq!(prot, back);
    }
}
