//! Calls the host cannot support
//!
//! Directories, sockets and process control have no semihosting
//! counterpart. They fail permanently with `ENOSYS` without a host call.

use log::warn;

use super::Syscalls;
use crate::errno::Errno;
use crate::semihosting::HostCall;

/// Every POSIX call this layer answers with `ENOSYS`.
pub const UNSUPPORTED: &[&str] = &[
    "mkdir", "rmdir", "sync", "chdir", "opendir", "readdir", "readdir_r", "rewinddir",
    "closedir", "socket", "socketpair", "accept", "bind", "connect", "getpeername",
    "getsockname", "getsockopt", "listen", "recv", "recvfrom", "recvmsg", "send", "sendmsg",
    "sendto", "setsockopt", "shutdown", "sockatmark", "select", "writev", "ioctl", "fcntl",
    "ftruncate", "fsync", "chmod", "truncate", "utime", "execve", "fork", "kill", "raise",
    "wait", "chown", "link", "symlink", "readlink",
];

impl<H: HostCall, const N: usize> Syscalls<H, N> {
    /// Record `ENOSYS` for `call` and return it.
    pub fn unsupported(&mut self, call: &'static str) -> Errno {
        warn!("{}() ENOSYS", call);
        self.set_errno(Errno::ENOSYS);
        Errno::ENOSYS
    }
}
