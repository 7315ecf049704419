//! Informational process and module descriptions
//!
//! These types are inputs to the core: enumeration of processes and modules
//! is left to OS collaborators, which fill these structs in. The view layer
//! only reads their fields, e.g. to form a range over a module image.

use super::address::Address;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process identifier
pub type ProcessId = u32;

/// CPU architecture of a process image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    X86,
    X86_64,
    Arm,
    Arm64,
    Unknown,
}

impl Architecture {
    /// Pointer width in bytes for the architecture
    pub const fn pointer_size(&self) -> usize {
        match self {
            Architecture::X86 | Architecture::Arm => 4,
            Architecture::X86_64 | Architecture::Arm64 => 8,
            Architecture::Unknown => std::mem::size_of::<usize>(),
        }
    }
}

/// A module (executable image or shared library) loaded in some process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessModule {
    /// Base address of the mapped image
    pub base: Address,
    /// Size of the mapped image in bytes
    pub size: usize,
    /// Filesystem path of the image, when known
    pub path: Option<PathBuf>,
    /// Short name of the image, when known
    pub name: Option<String>,
}

impl ProcessModule {
    /// Creates a module description from its base and size
    pub fn new(base: Address, size: usize) -> Self {
        ProcessModule {
            base,
            size,
            path: None,
            name: None,
        }
    }

    /// End address of the image (`base + size`, saturating)
    pub fn end(&self) -> Address {
        Address::new(self.base.as_usize().saturating_add(self.size))
    }

    /// Whether an address falls inside the image
    pub fn contains_address(&self, address: Address) -> bool {
        address >= self.base && address < self.end()
    }
}

/// A process known to the OS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsProcess {
    /// Process identifier
    pub id: ProcessId,
    /// Executable name, when known
    pub name: Option<String>,
    /// Architecture the process runs as
    pub architecture: Architecture,
    /// The process's main executable image, when known
    pub main_module: Option<ProcessModule>,
    /// Filesystem path of the executable, when known
    pub path: Option<PathBuf>,
    /// Whether the process was running at enumeration time
    pub is_running: Option<bool>,
    /// Whether the process runs with elevated privileges
    pub is_elevated: Option<bool>,
}

impl OsProcess {
    /// Creates a minimal process description
    pub fn new(id: ProcessId, architecture: Architecture) -> Self {
        OsProcess {
            id,
            name: None,
            architecture,
            main_module: None,
            path: None,
            is_running: None,
            is_elevated: None,
        }
    }
}
