//! Fundamental value types shared across the crate

mod address;
mod error;
mod process_info;
mod protection;

pub use address::Address;
pub use error::{PatternError, SystemError};
pub use process_info::{Architecture, OsProcess, ProcessId, ProcessModule};
pub use protection::Protection;
