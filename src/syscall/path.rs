//! Stateless path operations: rename, unlink, system

use core::ffi::CStr;

use super::Syscalls;
use crate::errno::{Errno, Result};
use crate::semihosting::{Argument, Field, HostCall, Operation, Response};

/// `WEXITSTATUS` as newlib defines it.
#[inline]
const fn wexitstatus(status: i32) -> i32 {
    (status >> 8) & 0xff
}

/// Encode a raw exit code as a wait status.
///
/// Shifts the code left until `WEXITSTATUS` recovers it, so the encoding
/// is found rather than hard coded.
pub fn wait_status(exit_code: i32) -> i32 {
    let mut status = exit_code;
    while status != 0 && wexitstatus(status) != exit_code {
        status <<= 1;
    }
    status
}

impl<H: HostCall, const N: usize> Syscalls<H, N> {
    /// Rename a file on the host.
    pub fn rename(&mut self, from: &CStr, to: &CStr) -> Result<()> {
        let mut block = [
            from.as_ptr() as Field,
            from.to_bytes().len(),
            to.as_ptr() as Field,
            to.to_bytes().len(),
        ];
        // SAFETY: Both strings outlive the call
        let response = unsafe { self.call(Operation::Rename, Argument::Block(&mut block)) };
        self.path_status(response)
    }

    /// Remove a file on the host.
    pub fn unlink(&mut self, path: &CStr) -> Result<()> {
        let mut block = [path.as_ptr() as Field, path.to_bytes().len()];
        // SAFETY: `path` outlives the call
        let response = unsafe { self.call(Operation::Remove, Argument::Block(&mut block)) };
        self.path_status(response)
    }

    /// Decode a `SYS_RENAME`/`SYS_REMOVE` response.
    ///
    /// Only `-1` carries a host errno. Other nonzero values are host
    /// specific codes and fail with `EIO` without a `SYS_ERRNO` round trip.
    fn path_status(&mut self, response: Response) -> Result<()> {
        match self.check(response)? {
            0 => Ok(()),
            _ => self.fail(Errno::EIO),
        }
    }

    /// Run a command in the host's shell and return its wait status.
    ///
    /// With no command, reports that a shell is available.
    pub fn system(&mut self, command: Option<&CStr>) -> Result<i32> {
        let Some(command) = command else {
            return Ok(1);
        };

        let mut block = [command.as_ptr() as Field, command.to_bytes().len()];
        // SAFETY: `command` outlives the call
        let response = unsafe { self.call(Operation::System, Argument::Block(&mut block)) };
        let code = self.check(response)? as i32;

        if (0..256).contains(&code) {
            Ok(wait_status(code))
        } else {
            Ok(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errno::Errno;
    use crate::fd::OpenFlags;
    use crate::semihosting::mock::{MockHost, HOST_ENOENT};

    #[test]
    fn test_wait_status_round_trips() {
        assert_eq!(wait_status(0), 0);
        for code in 1..256 {
            let status = wait_status(code);
            assert_eq!(wexitstatus(status), code);
            assert_eq!(status, code << 8);
        }
    }

    #[test]
    fn test_rename() {
        let mut sys: Syscalls<MockHost> =
            Syscalls::new(MockHost::new().with_file("/old", b"data"));
        assert_eq!(sys.rename(c"/old", c"/new"), Ok(()));
        assert_eq!(sys.host().file("/old"), None);
        assert_eq!(sys.host().file("/new"), Some(&b"data"[..]));
        assert_eq!(sys.rename(c"/old", c"/new"), Err(Errno(HOST_ENOENT)));
    }

    #[test]
    fn test_unlink() {
        let mut sys: Syscalls<MockHost> = Syscalls::new(MockHost::new().with_file("/f", b""));
        assert_eq!(sys.unlink(c"/f"), Ok(()));
        assert_eq!(sys.unlink(c"/f"), Err(Errno(HOST_ENOENT)));
        assert_eq!(sys.errno(), Errno(HOST_ENOENT));
        assert!(sys.open(c"/f", OpenFlags::RDONLY).is_err());
    }

    #[test]
    fn test_host_specific_path_status_is_eio() {
        let mut host = MockHost::new().with_file("/f", b"");
        host.path_status = Some(13);
        let mut sys: Syscalls<MockHost> = Syscalls::new(host);

        assert_eq!(sys.unlink(c"/f"), Err(Errno::EIO));
        assert_eq!(sys.rename(c"/f", c"/g"), Err(Errno::EIO));
        assert_eq!(sys.errno(), Errno::EIO);
        assert_eq!(sys.host().count(Operation::Errno), 0);
    }

    #[test]
    fn test_system() {
        let mut host = MockHost::new();
        host.system_status = 3;
        let mut sys: Syscalls<MockHost> = Syscalls::new(host);
        assert_eq!(sys.system(None), Ok(1));
        assert_eq!(sys.system(Some(c"make check")), Ok(3 << 8));
        assert_eq!(sys.host().last_command.as_deref(), Some(&b"make check"[..]));

        sys.host_mut().system_status = -1;
        assert!(sys.system(Some(c"false")).is_err());
    }
}
