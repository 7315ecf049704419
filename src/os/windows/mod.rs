//! Windows backend: process handles and the Win32 virtual-memory APIs

pub mod bindings;
mod handle;
mod view;

pub use bindings::{protection_from_native, protection_to_native};
pub use handle::Handle;
pub use view::ProcessView;
