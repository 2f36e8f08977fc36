//! semiposix - POSIX System Calls over ARM Semihosting
//!
//! Gives bare-metal ARM programs a file and time API backed by the debugger
//! or emulator they run under.
//!
//! # Layers
//! - `semihosting`: operation numbers, the [`HostCall`] gateway and the trap
//! - `fd`: bounded descriptor table mapping POSIX descriptors to host handles
//! - `syscall`: [`Syscalls`], the POSIX calls themselves
//! - `startup`: command line retrieval and program termination
//! - `trace`: a `log` backend that writes through the host
//! - `ffi` (feature `newlib`): C entry points for newlib; `newlib-stubs`
//!   adds `ENOSYS` exports
//!
//! # Example
//! ```ignore
//! let mut sys: Syscalls<Semihosting> = Syscalls::new(Semihosting);
//! let fd = sys.open(c"out.txt", OpenFlags::WRONLY | OpenFlags::CREAT)?;
//! sys.write(fd, b"hello\n")?;
//! sys.close(fd)?;
//! ```
//!
//! # Target
//! - AArch32 M-profile (`BKPT #0xAB`) and AArch64 (`HLT #0xF000`)
//! - Single thread of execution; callers serialize access

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod errno;
pub mod fd;
pub mod semihosting;
pub mod startup;
pub mod syscall;
pub mod trace;

#[cfg(any(
    test,
    all(feature = "newlib", any(target_arch = "arm", target_arch = "aarch64"))
))]
pub mod ffi;

pub use errno::{Errno, Result};
pub use fd::{Fd, OpenFlags, Whence};
pub use semihosting::HostCall;
#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
pub use semihosting::Semihosting;
pub use startup::{terminate, CommandLine};
pub use syscall::{Stat, Syscalls, STDERR, STDIN, STDOUT};
