//! POSIX error numbers
//!
//! Values follow newlib's `<sys/errno.h>`, which is what bare-metal ARM
//! toolchains link against. Codes reported by the host are passed through
//! untouched.

use core::fmt;

/// A POSIX `errno` value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[repr(transparent)]
pub struct Errno(pub i32);

impl Errno {
    /// Operation not permitted
    pub const EPERM: Self = Self(1);
    /// No such file or directory
    pub const ENOENT: Self = Self(2);
    /// I/O error
    pub const EIO: Self = Self(5);
    /// Bad file descriptor
    pub const EBADF: Self = Self(9);
    /// Permission denied
    pub const EACCES: Self = Self(13);
    /// File exists
    pub const EEXIST: Self = Self(17);
    /// Invalid argument
    pub const EINVAL: Self = Self(22);
    /// Too many open files
    pub const EMFILE: Self = Self(24);
    /// Result too large
    pub const ERANGE: Self = Self(34);
    /// Function not implemented
    pub const ENOSYS: Self = Self(88);
    /// Value too large for defined data type
    pub const EOVERFLOW: Self = Self(139);

    /// Raw error number.
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::EPERM => "operation not permitted",
            Self::ENOENT => "no such file or directory",
            Self::EIO => "i/o error",
            Self::EBADF => "bad file descriptor",
            Self::EACCES => "permission denied",
            Self::EEXIST => "file exists",
            Self::EINVAL => "invalid argument",
            Self::EMFILE => "too many open files",
            Self::ERANGE => "result too large",
            Self::ENOSYS => "function not implemented",
            Self::EOVERFLOW => "value too large",
            _ => return None,
        })
    }
}

impl From<i32> for Errno {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (errno {})", name, self.0),
            None => write!(f, "errno {}", self.0),
        }
    }
}

/// Result type used by every translated call.
pub type Result<T> = core::result::Result<T, Errno>;
