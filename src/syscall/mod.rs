//! System Call Translation
//!
//! POSIX calls implemented on top of semihosting operations.
//!
//! # Model
//! - [`Syscalls`] owns the gateway and the descriptor table; constructing it
//!   opens the standard streams
//! - Each call validates its descriptor locally, builds a parameter block,
//!   traps to the host, and decodes the response
//! - Failures return `Err(Errno)` and record the code as the process errno
//!
//! # Concurrency
//! Single-threaded and non-reentrant. Embedders with more than one thread of
//! execution must serialize access themselves.

mod file;
mod path;
mod process;
mod stat;
mod time;
mod unsupported;

use core::ffi::CStr;

use log::trace;

use crate::config::{MAX_OPEN_FILES, STD_STREAMS, TELETYPE};
use crate::errno::{Errno, Result};
use crate::fd::{Fd, FileTable, HostHandle, OpenFile};
use crate::semihosting::{mode, Argument, Field, HostCall, Operation, Response};

pub use path::wait_status;
pub use stat::{Mode, Stat};
pub use time::{Clock, TimeVal, TimeZone, Tms};
pub use unsupported::UNSUPPORTED;

/// Standard input descriptor.
pub const STDIN: Fd = 0;
/// Standard output descriptor.
pub const STDOUT: Fd = 1;
/// Standard error descriptor.
pub const STDERR: Fd = 2;

/// The translation context: one gateway, one descriptor table.
#[derive(Debug)]
pub struct Syscalls<H: HostCall, const N: usize = MAX_OPEN_FILES> {
    host: H,
    files: FileTable<N>,
    errno: Errno,
    errno_pending: bool,
}

impl<H: HostCall, const N: usize> Syscalls<H, N> {
    /// Take ownership of the gateway and open the standard streams.
    ///
    /// The host's teletype pseudo-file is opened three times: "r" for
    /// stdin, "w" for stdout and "a" for stderr. If the append open fails,
    /// stderr shares stdout's handle.
    pub fn new(host: H) -> Self {
        const {
            assert!(N >= STD_STREAMS, "table cannot hold the standard streams");
        }

        let mut sys = Self {
            host,
            files: FileTable::new(),
            errno: Errno::default(),
            errno_pending: false,
        };

        let stdin = sys.open_host(TELETYPE, mode::READ);
        let stdout = sys.open_host(TELETYPE, mode::WRITE);
        let mut stderr = sys.open_host(TELETYPE, mode::APPEND);
        if stderr == -1 {
            stderr = stdout;
        }

        sys.files.install(STDIN, stdin);
        sys.files.install(STDOUT, stdout);
        sys.files.install(STDERR, stderr);
        sys
    }

    /// The last error recorded, like C `errno`.
    #[inline]
    pub fn errno(&self) -> Errno {
        self.errno
    }

    /// The error recorded since the previous call, if any.
    pub fn take_errno(&mut self) -> Option<Errno> {
        if core::mem::take(&mut self.errno_pending) {
            Some(self.errno)
        } else {
            None
        }
    }

    /// The descriptor table.
    #[inline]
    pub fn files(&self) -> &FileTable<N> {
        &self.files
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Trap to the host.
    ///
    /// # Safety
    /// Same contract as [`HostCall::call_host`].
    unsafe fn call(&mut self, op: Operation, arg: Argument<'_>) -> Response {
        trace!("host {:?} {:?}", op, arg);
        // SAFETY: Forwarded contract
        let response = unsafe { self.host.call_host(op, arg) };
        trace!("host {:?} -> {}", op, response);
        response
    }

    /// Ask the host for the cause of its last failure.
    fn host_errno(&mut self) -> Errno {
        // SAFETY: SYS_ERRNO takes no parameter
        let code = unsafe { self.call(Operation::Errno, Argument::None) };
        Errno(code as i32)
    }

    fn set_errno(&mut self, errno: Errno) {
        self.errno = errno;
        self.errno_pending = true;
    }

    /// Record `errno` and fail with it.
    fn fail<T>(&mut self, errno: Errno) -> Result<T> {
        self.set_errno(errno);
        Err(errno)
    }

    /// Fail with whatever the host reports as its last error.
    fn host_failure<T>(&mut self) -> Result<T> {
        let errno = self.host_errno();
        self.fail(errno)
    }

    /// Map the host's `-1` failure sentinel to an error.
    fn check(&mut self, response: Response) -> Result<Response> {
        if response == -1 {
            self.host_failure()
        } else {
            Ok(response)
        }
    }

    /// Copy out a live slot, or fail with `EBADF`.
    fn descriptor(&mut self, fd: Fd, call: &'static str) -> Result<OpenFile> {
        match self.files.lookup(fd) {
            Ok(file) => Ok(*file),
            Err(errno) => {
                log::debug!("{}({}) EBADF", call, fd);
                self.fail(errno)
            }
        }
    }

    fn set_position(&mut self, fd: Fd, position: i64) {
        if let Ok(file) = self.files.lookup(fd) {
            file.position = position;
        }
    }

    /// Open `path` on the host without touching the table.
    fn open_host(&mut self, path: &CStr, mode: Field) -> HostHandle {
        let mut block = [path.as_ptr() as Field, mode, path.to_bytes().len()];
        // SAFETY: `path` outlives the call
        unsafe { self.call(Operation::Open, Argument::Block(&mut block)) }
    }

    fn close_host(&mut self, handle: HostHandle) -> Response {
        let mut block = [handle as Field];
        // SAFETY: Block holds no pointers
        unsafe { self.call(Operation::Close, Argument::Block(&mut block)) }
    }

    /// Query the length of the file behind `handle`.
    fn file_length(&mut self, handle: HostHandle) -> Result<i64> {
        let mut block = [handle as Field];
        // SAFETY: Block holds no pointers
        let response = unsafe { self.call(Operation::Flen, Argument::Block(&mut block)) };
        if response < 0 {
            return self.host_failure();
        }
        Ok(response as i64)
    }
}
