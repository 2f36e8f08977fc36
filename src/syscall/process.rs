//! Process identity and working directory

use core::ffi::CStr;

use super::Syscalls;
use crate::config::FALLBACK_CWD;
use crate::errno::{Errno, Result};
use crate::semihosting::HostCall;

impl<H: HostCall, const N: usize> Syscalls<H, N> {
    /// There is exactly one process.
    pub fn getpid(&self) -> i32 {
        1
    }

    /// Copy the working directory into `buf`.
    ///
    /// Semihosting has no working directory; the temporary folder stands
    /// in for it.
    pub fn getcwd<'b>(&mut self, buf: &'b mut [u8]) -> Result<&'b CStr> {
        let cwd = FALLBACK_CWD.to_bytes_with_nul();
        let Some(dst) = buf.get_mut(..cwd.len()) else {
            return self.fail(Errno::ERANGE);
        };
        dst.copy_from_slice(cwd);
        CStr::from_bytes_with_nul(dst).map_err(|_| Errno::EINVAL)
    }
}
