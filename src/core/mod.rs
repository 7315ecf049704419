//! Core module containing the fundamental types used throughout memscope
//!
//! Everything here is a plain value type: addresses, protection states,
//! process/module descriptions, and the two error taxonomies (signature
//! parse errors and view construction errors).

pub mod types;

pub use types::{
    Address, Architecture, OsProcess, PatternError, ProcessId, ProcessModule, Protection,
    SystemError,
};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
