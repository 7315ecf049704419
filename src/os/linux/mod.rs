//! Linux backend: pid-addressed vm transfer syscalls and `/proc` maps

mod view;

pub use view::{protection_from_native, protection_to_native, ProcessView};
