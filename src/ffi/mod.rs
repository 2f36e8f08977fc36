//! newlib System Call Surface
//!
//! C entry points with the names newlib's libc expects from a board support
//! package.
//!
//! # Features
//! - `newlib`: file, time and process calls, `_exit`, `getcwd`
//! - `newlib-stubs`: additionally, `ENOSYS` stubs for directory, socket and
//!   process control calls. Opt in only when libc provides none of them;
//!   every export is a strong symbol.
//!
//! # Safety
//! Pointer arguments follow the usual C contracts: strings are
//! NUL-terminated, buffers are valid for the length passed.

mod abi;

#[cfg(all(feature = "newlib", any(target_arch = "arm", target_arch = "aarch64")))]
pub mod exports;

pub use abi::{ClockT, NewlibStat, NewlibTimeval, NewlibTimezone, NewlibTms, Timespec};
