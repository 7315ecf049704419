//! OS-backed foreign-process views
//!
//! One `ProcessView` per platform, selected at compile time. All three
//! implement [`crate::memory::MemView`] with the same outcome model;
//! constructing one is the only operation that can error.

#[cfg(windows)]
pub mod windows;
#[cfg(windows)]
pub use windows::ProcessView;

#[cfg(target_os = "macos")]
pub mod darwin;
#[cfg(target_os = "macos")]
pub use darwin::ProcessView;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "linux")]
pub use linux::ProcessView;

#[cfg(not(any(windows, target_os = "macos", target_os = "linux")))]
compile_error!("memscope supports Windows, macOS and Linux targets");
