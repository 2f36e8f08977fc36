//! Descriptor I/O: open, close, read, write, lseek, isatty

use core::ffi::CStr;

use log::debug;

use super::{Syscalls, STDERR, STDOUT};
use crate::errno::{Errno, Result};
use crate::fd::{Fd, HostHandle, OpenFlags, Whence};
use crate::semihosting::{mode, transferred, Argument, Field, HostCall, Operation};

impl<H: HostCall, const N: usize> Syscalls<H, N> {
    /// Open `path` and return the lowest free descriptor.
    ///
    /// The host has no notion of permissions, so there is no mode argument.
    pub fn open(&mut self, path: &CStr, flags: OpenFlags) -> Result<Fd> {
        let fd = match self.files.allocate() {
            Ok(fd) => fd,
            Err(errno) => {
                debug!("open() EMFILE");
                return self.fail(errno);
            }
        };

        if path.is_empty() {
            return self.fail(Errno::ENOENT);
        }

        if flags.contains(OpenFlags::CREAT | OpenFlags::EXCL) && self.exists(path) {
            debug!("open() EEXIST");
            return self.fail(Errno::EEXIST);
        }

        let handle = self.open_host(path, flags.host_mode());
        if handle < 0 {
            return self.host_failure();
        }

        self.files.install(fd, handle);
        Ok(fd)
    }

    /// Probe whether the host can open `path` for reading.
    fn exists(&mut self, path: &CStr) -> bool {
        let handle = self.open_host(path, mode::READ);
        if handle < 0 {
            return false;
        }
        self.close_host(handle);
        true
    }

    /// Look up the handle behind a live descriptor.
    fn handle_of(&mut self, fd: Fd) -> Option<HostHandle> {
        self.files.lookup(fd).ok().map(|file| file.handle)
    }

    /// Close a descriptor.
    ///
    /// When stdout and stderr share one host handle, closing either only
    /// frees the local slot; the handle stays open for the other.
    pub fn close(&mut self, fd: Fd) -> Result<()> {
        let file = self.descriptor(fd, "close")?;

        if fd == STDOUT || fd == STDERR {
            let shared = match (self.handle_of(STDOUT), self.handle_of(STDERR)) {
                (Some(out), Some(err)) => out == err,
                _ => false,
            };
            if shared {
                self.files.release(fd);
                return Ok(());
            }
        }

        if self.close_host(file.handle) != 0 {
            return self.host_failure();
        }
        self.files.release(fd);
        Ok(())
    }

    /// Read into `buf`, returning the number of bytes read.
    ///
    /// Zero means end of file.
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        let file = self.descriptor(fd, "read")?;

        let requested = buf.len();
        let mut block = [file.handle as Field, buf.as_mut_ptr() as Field, requested];
        // SAFETY: `buf` is exclusively borrowed for the call
        let response = unsafe { self.call(Operation::Read, Argument::Block(&mut block)) };

        let Some(count) = transferred(requested, response) else {
            return self.host_failure();
        };
        self.set_position(fd, file.position.saturating_add(count as i64));
        Ok(count)
    }

    /// Write `buf`, returning the number of bytes written.
    ///
    /// A write that moves nothing still returns `Ok(0)`, with errno
    /// refreshed from the host. The protocol cannot tell a refused write
    /// from an empty one, and stdio relies on the non-negative result.
    pub fn write(&mut self, fd: Fd, buf: &[u8]) -> Result<usize> {
        let file = self.descriptor(fd, "write")?;

        let requested = buf.len();
        let mut block = [file.handle as Field, buf.as_ptr() as Field, requested];
        // SAFETY: `buf` is borrowed for the call; the host only reads it
        let response = unsafe { self.call(Operation::Write, Argument::Block(&mut block)) };

        let Some(count) = transferred(requested, response) else {
            return self.host_failure();
        };
        self.set_position(fd, file.position.saturating_add(count as i64));

        if count == 0 {
            let errno = self.host_errno();
            self.set_errno(errno);
        }
        Ok(count)
    }

    /// Reposition a descriptor and return the new absolute offset.
    ///
    /// The host only does absolute seeks, so `SEEK_CUR` is resolved from
    /// the tracked position and `SEEK_END` from the host file length.
    pub fn lseek(&mut self, fd: Fd, offset: i64, whence: i32) -> Result<i64> {
        let file = self.descriptor(fd, "lseek")?;

        let whence = match Whence::try_from(whence) {
            Ok(whence) => whence,
            Err(errno) => return self.fail(errno),
        };

        let absolute = match whence {
            Whence::Set => offset,
            Whence::Cur => match file.position.checked_add(offset) {
                Some(absolute) => absolute,
                None if file.position > 0 && offset > 0 => {
                    return self.fail(Errno::EOVERFLOW)
                }
                None => return self.fail(Errno::EINVAL),
            },
            Whence::End => {
                let length = self.file_length(file.handle)?;
                match length.checked_add(offset) {
                    Some(absolute) => absolute,
                    None => return self.fail(Errno::EOVERFLOW),
                }
            }
        };

        if absolute < 0 {
            return self.fail(Errno::EINVAL);
        }
        let Ok(target) = isize::try_from(absolute) else {
            return self.fail(Errno::EOVERFLOW);
        };

        let mut block = [file.handle as Field, target as Field];
        // SAFETY: Block holds no pointers
        let response = unsafe { self.call(Operation::Seek, Argument::Block(&mut block)) };
        if response < 0 {
            return self.host_failure();
        }

        self.set_position(fd, absolute);
        Ok(absolute)
    }

    /// Ask the host whether a descriptor is an interactive terminal.
    ///
    /// Any answer other than "yes" refreshes errno from the host.
    pub fn isatty(&mut self, fd: Fd) -> Result<bool> {
        let file = self.descriptor(fd, "isatty")?;

        let mut block = [file.handle as Field];
        // SAFETY: Block holds no pointers
        let response = unsafe { self.call(Operation::IsTty, Argument::Block(&mut block)) };
        if response == 1 {
            return Ok(true);
        }

        let errno = self.host_errno();
        self.set_errno(errno);
        Ok(false)
    }
}
