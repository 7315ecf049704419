//! Darwin backend: Mach task ports and the `mach_vm_*` family

mod port;
mod view;

pub use port::TaskPort;
pub use view::{protection_from_native, protection_to_native, ProcessView};
