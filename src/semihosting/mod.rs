//! ARM Semihosting
//!
//! Operation numbers, the gateway trait and the trap that implements it.
//!
//! # Protocol
//! - One operation number plus one register-sized argument per call
//! - Most arguments point at a fixed-layout block of register-sized fields
//! - Failures are signalled by a sentinel response; the cause is queried
//!   separately with `SYS_ERRNO`

mod host;
mod op;

#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
mod arch;

#[cfg(test)]
pub mod mock;

pub use host::{transferred, Argument, Field, HostCall, Response};
pub use op::{mode, ExitReason, Operation};

#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
pub use arch::{halt, Semihosting};

/// Park the CPU forever.
#[cfg(not(any(target_arch = "arm", target_arch = "aarch64")))]
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
