//! File status
//!
//! The host offers a length query and nothing else, so the status record is
//! synthesized: every open file looks like a character device with
//! 1024-byte blocks.

use core::ffi::CStr;

use bitflags::bitflags;

use super::Syscalls;
use crate::config::STAT_BLOCK_SIZE;
use crate::errno::Result;
use crate::fd::{Fd, OpenFlags};
use crate::semihosting::HostCall;

bitflags! {
    /// `st_mode` bits.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct Mode: u32 {
        const IFCHR = 0o020000;
    }
}

impl Mode {
    /// File type mask.
    pub const IFMT: u32 = 0o170000;
}

/// File status, as far as the host can describe it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Stat {
    pub dev: u32,
    pub ino: u32,
    pub mode: Mode,
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u32,
    pub size: i64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
    pub blksize: i64,
    pub blocks: i64,
}

impl<H: HostCall, const N: usize> Syscalls<H, N> {
    /// Status of an open descriptor.
    pub fn fstat(&mut self, fd: Fd) -> Result<Stat> {
        let file = self.descriptor(fd, "fstat")?;
        let size = self.file_length(file.handle)?;
        Ok(Stat {
            mode: Mode::IFCHR,
            blksize: STAT_BLOCK_SIZE,
            size,
            ..Stat::default()
        })
    }

    /// Status of a file by name.
    ///
    /// Opens the file read-only for the duration of the query. The
    /// transient descriptor is always released; a failing close is ignored.
    pub fn stat(&mut self, path: &CStr) -> Result<Stat> {
        let fd = self.open(path, OpenFlags::RDONLY)?;
        let status = self.fstat(fd);

        let errno = (self.errno, self.errno_pending);
        if self.close(fd).is_err() {
            self.files.release(fd);
        }
        (self.errno, self.errno_pending) = errno;

        status
    }
}
