//! RAII Mach task port

use crate::core::types::SystemError;
use mach2::kern_return::{KERN_FAILURE, KERN_NO_ACCESS, KERN_PROTECTION_FAILURE, KERN_SUCCESS};
use mach2::mach_port::mach_port_deallocate;
use mach2::port::{mach_port_t, MACH_PORT_NULL};
use mach2::traps::{mach_task_self, task_for_pid};

/// Owned task port, deallocated on drop.
///
/// The port naming our own task (`mach_task_self`) is owned by the kernel
/// for the lifetime of the process and is never deallocated here.
pub struct TaskPort {
    port: mach_port_t,
}

impl TaskPort {
    /// Obtains the task port for `pid` via `task_for_pid`.
    ///
    /// Targeting another process requires the debugging entitlement or
    /// root; refusal surfaces as [`SystemError::AccessDenied`].
    pub fn for_pid(pid: i32) -> Result<Self, SystemError> {
        let mut port: mach_port_t = MACH_PORT_NULL;
        let result = unsafe { task_for_pid(mach_task_self(), pid, &mut port) };
        match result {
            KERN_SUCCESS => Ok(TaskPort { port }),
            KERN_FAILURE | KERN_PROTECTION_FAILURE | KERN_NO_ACCESS => Err(
                SystemError::access_denied(format!("task_for_pid({pid}) returned {result}")),
            ),
            other => Err(SystemError::operation_failed(format!(
                "task_for_pid({pid}) returned {other}"
            ))),
        }
    }

    /// The port naming the current task
    pub fn own_task() -> Self {
        TaskPort {
            port: unsafe { mach_task_self() },
        }
    }

    /// The raw port name
    pub fn raw(&self) -> mach_port_t {
        self.port
    }
}

impl Drop for TaskPort {
    fn drop(&mut self) {
        let own = unsafe { mach_task_self() };
        if self.port != MACH_PORT_NULL && self.port != own {
            unsafe {
                mach_port_deallocate(own, self.port);
            }
        }
        self.port = MACH_PORT_NULL;
    }
}

// A port name is task-local; sending it to another thread is fine,
// concurrent use is the caller's problem. No Sync.
unsafe impl Send for TaskPort {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_own_task_port_survives_drop() {
        drop(TaskPort::own_task());
        let port = TaskPort::own_task();
        assert_ne!(port.raw(), MACH_PORT_NULL);
    }
}
