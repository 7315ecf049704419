//! RAII process handle

use std::ptr;
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::winnt::HANDLE;

/// Owned Windows HANDLE closed on drop.
///
/// Both `NULL` and `INVALID_HANDLE_VALUE` count as "no handle" and are
/// never passed to `CloseHandle`; the latter also covers the
/// `GetCurrentProcess()` pseudo handle, so a handle representing the
/// current process is never closed.
pub struct Handle {
    raw: HANDLE,
}

impl Handle {
    /// Wraps a raw handle
    pub fn new(raw: HANDLE) -> Self {
        Handle { raw }
    }

    /// A handle wrapping no OS object
    pub fn null() -> Self {
        Handle {
            raw: ptr::null_mut(),
        }
    }

    /// The raw handle value, pseudo handles included
    pub fn raw(&self) -> HANDLE {
        self.raw
    }

    /// Whether the handle wraps a closeable OS object
    pub fn is_closeable(&self) -> bool {
        !self.raw.is_null() && self.raw != INVALID_HANDLE_VALUE
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if self.is_closeable() {
            // Close failures during teardown have no recovery path.
            unsafe {
                CloseHandle(self.raw);
            }
            self.raw = ptr::null_mut();
        }
    }
}

// The wrapped HANDLE is process-local and only dereferenced by kernel
// calls; moving it across threads is fine. Concurrent use is not, so no
// Sync.
unsafe impl Send for Handle {}
