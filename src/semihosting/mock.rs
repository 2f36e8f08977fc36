//! In-memory host for unit tests
//!
//! Behaves like a debugger serving a tiny filesystem: named byte stores, a
//! handle table with per-handle positions, and a `:tt` console.

use std::collections::{BTreeMap, VecDeque};
use std::ffi::CStr;
use std::vec::Vec;

use super::host::{Argument, Field, HostCall, Response};
use super::op::{mode, Operation};

/// Host-side error numbers the mock reports through `SYS_ERRNO`.
pub const HOST_ENOENT: i32 = 2;
pub const HOST_EBADF: i32 = 9;
pub const HOST_EIO: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Tty,
    File(Vec<u8>),
}

#[derive(Debug)]
struct Handle {
    target: Target,
    pos: usize,
    readable: bool,
    writable: bool,
    append: bool,
}

/// A recorded host call: the operation and a copy of its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Operation,
    pub fields: Vec<Field>,
}

#[derive(Debug)]
pub struct MockHost {
    /// Files known to the host, by name.
    pub files: BTreeMap<Vec<u8>, Vec<u8>>,
    handles: BTreeMap<Response, Handle>,
    next_handle: Response,
    errno: i32,
    /// Every call made, in order.
    pub calls: Vec<Call>,
    /// Bytes written to any `:tt` handle.
    pub console: Vec<u8>,
    /// Bytes written through `SYS_WRITE0`.
    pub debug: Vec<u8>,
    /// Bytes served to reads from `:tt`.
    pub stdin: VecDeque<u8>,
    /// Refuse to open `:tt` in append mode.
    pub fail_append_tty: bool,
    /// Report every write as fully unwritten, without an error.
    pub refuse_writes: bool,
    /// Fail the next `SYS_CLOSE`.
    pub fail_close: bool,
    /// Fail every `SYS_FLEN`.
    pub fail_flen: bool,
    /// Raw response for `SYS_REMOVE` and `SYS_RENAME`, bypassing the
    /// filesystem.
    pub path_status: Option<Response>,
    pub time: Response,
    pub clock: Response,
    pub elapsed: u64,
    pub tick_freq: Response,
    pub cmdline: Option<Vec<u8>>,
    pub system_status: Response,
    /// Last command handed to `SYS_SYSTEM`.
    pub last_command: Option<Vec<u8>>,
    /// Register value or block passed to `SYS_EXIT`.
    pub exit: Option<Vec<Field>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            handles: BTreeMap::new(),
            next_handle: 1,
            errno: 0,
            calls: Vec::new(),
            console: Vec::new(),
            debug: Vec::new(),
            stdin: VecDeque::new(),
            fail_append_tty: false,
            refuse_writes: false,
            fail_close: false,
            fail_flen: false,
            path_status: None,
            time: 0,
            clock: 0,
            elapsed: 0,
            tick_freq: 100,
            cmdline: None,
            system_status: 0,
            last_command: None,
            exit: None,
        }
    }

    /// Add a file with the given contents.
    pub fn with_file(mut self, name: &str, contents: &[u8]) -> Self {
        self.files.insert(name.as_bytes().to_vec(), contents.to_vec());
        self
    }

    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name.as_bytes()).map(Vec::as_slice)
    }

    /// Number of calls made for `op`.
    pub fn count(&self, op: Operation) -> usize {
        self.calls.iter().filter(|c| c.op == op).count()
    }

    /// Handles currently open on the host.
    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }

    fn fail(&mut self, errno: i32) -> Response {
        self.errno = errno;
        -1
    }

    fn open(&mut self, fields: &[Field]) -> Response {
        // SAFETY: Callers pass a live path slice
        let name = unsafe { bytes(fields[0], fields[2]) }.to_vec();
        let bits = fields[1] & !mode::BINARY;
        let plus = bits & mode::PLUS != 0;
        let append = bits & mode::APPEND != 0;
        let write = bits & mode::WRITE != 0;

        let target = if name == b":tt" {
            if append && self.fail_append_tty {
                return self.fail(HOST_EIO);
            }
            Target::Tty
        } else {
            if write {
                self.files.insert(name.clone(), Vec::new());
            } else if append {
                self.files.entry(name.clone()).or_default();
            } else if !self.files.contains_key(&name) {
                return self.fail(HOST_ENOENT);
            }
            Target::File(name)
        };

        let handle = self.next_handle;
        self.next_handle += 1;
        self.handles.insert(
            handle,
            Handle {
                target,
                pos: 0,
                readable: !(write || append) || plus,
                writable: write || append || plus,
                append,
            },
        );
        handle
    }

    fn transfer(&mut self, op: Operation, fields: &[Field]) -> Response {
        let (handle, ptr, len) = (fields[0] as Response, fields[1], fields[2]);
        let refuse_writes = self.refuse_writes;
        let Some(h) = self.handles.get_mut(&handle) else {
            return self.fail(HOST_EBADF);
        };

        if op == Operation::Write {
            if !h.writable {
                self.errno = HOST_EBADF;
                return len as Response;
            }
            if refuse_writes {
                return len as Response;
            }
            // SAFETY: Callers pass a live buffer
            let data = unsafe { bytes(ptr, len) };
            match &h.target {
                Target::Tty => self.console.extend_from_slice(data),
                Target::File(name) => {
                    let file = self.files.entry(name.clone()).or_default();
                    let at = if h.append { file.len() } else { h.pos };
                    if file.len() < at + len {
                        file.resize(at + len, 0);
                    }
                    file[at..at + len].copy_from_slice(data);
                    h.pos = at + len;
                }
            }
            return 0;
        }

        if !h.readable {
            self.errno = HOST_EBADF;
            return len as Response;
        }
        // SAFETY: Callers pass a live, exclusively borrowed buffer
        let out = unsafe { core::slice::from_raw_parts_mut(ptr as *mut u8, len) };
        let mut n = 0;
        match &h.target {
            Target::Tty => {
                while n < len {
                    match self.stdin.pop_front() {
                        Some(b) => {
                            out[n] = b;
                            n += 1;
                        }
                        None => break,
                    }
                }
            }
            Target::File(name) => {
                let file = self.files.get(name).map(Vec::as_slice).unwrap_or(&[]);
                let start = h.pos.min(file.len());
                n = (file.len() - start).min(len);
                out[..n].copy_from_slice(&file[start..start + n]);
                h.pos = start + n;
            }
        }
        (len - n) as Response
    }

    fn handle_op(&mut self, op: Operation, arg: &mut Argument<'_>) -> Response {
        match (op, arg) {
            (Operation::Open, Argument::Block(f)) => self.open(f),
            (Operation::Close, Argument::Block(f)) => {
                if self.fail_close {
                    self.fail_close = false;
                    return self.fail(HOST_EIO);
                }
                match self.handles.remove(&(f[0] as Response)) {
                    Some(_) => 0,
                    None => self.fail(HOST_EBADF),
                }
            }
            (Operation::Read | Operation::Write, Argument::Block(f)) => self.transfer(op, f),
            (Operation::IsTty, Argument::Block(f)) => match self.handles.get(&(f[0] as Response)) {
                Some(h) if h.target == Target::Tty => 1,
                Some(_) => 0,
                None => self.fail(HOST_EBADF),
            },
            (Operation::Seek, Argument::Block(f)) => {
                let pos = f[1];
                let seekable = match self.handles.get_mut(&(f[0] as Response)) {
                    Some(h) if h.target != Target::Tty => {
                        h.pos = pos;
                        true
                    }
                    _ => false,
                };
                if seekable {
                    0
                } else {
                    self.fail(HOST_EBADF)
                }
            }
            (Operation::Flen, Argument::Block(_)) if self.fail_flen => self.fail(HOST_EIO),
            (Operation::Flen, Argument::Block(f)) => match self.handles.get(&(f[0] as Response)) {
                Some(Handle { target: Target::File(name), .. }) => {
                    self.files.get(name).map_or(0, |d| d.len() as Response)
                }
                Some(_) => 0,
                None => self.fail(HOST_EBADF),
            },
            (Operation::Remove | Operation::Rename, Argument::Block(_))
                if self.path_status.is_some() =>
            {
                self.path_status.unwrap_or(0)
            }
            (Operation::Remove, Argument::Block(f)) => {
                // SAFETY: Callers pass a live path slice
                let name = unsafe { bytes(f[0], f[1]) };
                match self.files.remove(name) {
                    Some(_) => 0,
                    None => self.fail(HOST_ENOENT),
                }
            }
            (Operation::Rename, Argument::Block(f)) => {
                // SAFETY: Callers pass live path slices
                let (from, to) = unsafe { (bytes(f[0], f[1]), bytes(f[2], f[3])) };
                match self.files.remove(from) {
                    Some(data) => {
                        self.files.insert(to.to_vec(), data);
                        0
                    }
                    None => self.fail(HOST_ENOENT),
                }
            }
            (Operation::System, Argument::Block(f)) => {
                // SAFETY: Callers pass a live command slice
                self.last_command = Some(unsafe { bytes(f[0], f[1]) }.to_vec());
                self.system_status
            }
            (Operation::GetCmdline, Argument::Block(f)) => {
                let Some(cmdline) = self.cmdline.clone() else {
                    return self.fail(HOST_EIO);
                };
                let n = cmdline.len().min(f[1].saturating_sub(1));
                // SAFETY: Callers pass a live buffer of f[1] bytes
                let out = unsafe { core::slice::from_raw_parts_mut(f[0] as *mut u8, f[1]) };
                out[..n].copy_from_slice(&cmdline[..n]);
                out[n] = 0;
                f[1] = n;
                0
            }
            (Operation::Elapsed, Argument::Block(f)) => {
                if f.len() == 1 {
                    f[0] = self.elapsed as Field;
                } else {
                    f[0] = (self.elapsed & 0xFFFF_FFFF) as Field;
                    f[1] = (self.elapsed >> 32) as Field;
                }
                0
            }
            (Operation::Write0, Argument::Word(ptr)) => {
                // SAFETY: Callers pass a NUL-terminated string
                let s = unsafe { CStr::from_ptr(*ptr as *const core::ffi::c_char) };
                self.debug.extend_from_slice(s.to_bytes());
                0
            }
            (Operation::Exit, Argument::Word(w)) => {
                self.exit = Some(std::vec![*w]);
                0
            }
            (Operation::Exit, Argument::Block(f)) => {
                self.exit = Some(f.to_vec());
                0
            }
            (Operation::Time, Argument::None) => self.time,
            (Operation::Clock, Argument::None) => self.clock,
            (Operation::TickFreq, Argument::None) => self.tick_freq,
            (Operation::Errno, Argument::None) => self.errno as Response,
            _ => self.fail(HOST_EIO),
        }
    }
}

/// # Safety
/// `ptr` must be valid for reads of `len` bytes.
unsafe fn bytes<'a>(ptr: Field, len: Field) -> &'a [u8] {
    // SAFETY: Caller contract
    unsafe { core::slice::from_raw_parts(ptr as *const u8, len) }
}

impl HostCall for MockHost {
    unsafe fn call_host(&mut self, op: Operation, mut arg: Argument<'_>) -> Response {
        let fields = match &arg {
            Argument::None => Vec::new(),
            Argument::Block(f) => f.to_vec(),
            Argument::Word(w) => std::vec![*w],
        };
        self.calls.push(Call { op, fields });
        self.handle_op(op, &mut arg)
    }
}
