//! File Descriptors
//!
//! The bounded table that maps small POSIX descriptors to opaque host
//! handles, plus the flag and whence types the translators accept.
//!
//! # Invariants
//! - The descriptor value is the slot index
//! - Descriptors 0, 1 and 2 belong to the standard streams after startup
//! - Every translator goes through [`FileTable::lookup`] before touching a
//!   slot

mod flags;
mod table;

pub use flags::{OpenFlags, Whence};
pub use table::{Fd, FileTable, HostHandle, OpenFile, FREE};
