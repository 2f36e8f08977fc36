//! Open flags and seek origins
//!
//! POSIX flag values follow newlib's `<sys/_default_fcntl.h>`.

use bitflags::bitflags;

use crate::errno::Errno;
use crate::semihosting::{mode, Field};

bitflags! {
    /// Flags accepted by `open`.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct OpenFlags: i32 {
        const WRONLY = 0x0001;
        const RDWR = 0x0002;
        const APPEND = 0x0008;
        const CREAT = 0x0200;
        const TRUNC = 0x0400;
        const EXCL = 0x0800;
        const BINARY = 0x1_0000;
    }
}

impl OpenFlags {
    /// Read-only is the absence of any access bit.
    pub const RDONLY: Self = Self::empty();

    /// Encode as a `SYS_OPEN` mode field.
    ///
    /// `O_APPEND` wins over the write bit; the host cannot express "w" and
    /// "a" at the same time. Note that `O_CREAT` alone selects "w", which
    /// truncates.
    pub fn host_mode(self) -> Field {
        let mut bits = mode::READ;
        if self.contains(Self::BINARY) {
            bits |= mode::BINARY;
        }
        if self.contains(Self::RDWR) {
            bits |= mode::PLUS;
        }
        if self.intersects(Self::CREAT | Self::TRUNC | Self::WRONLY) {
            bits |= mode::WRITE;
        }
        if self.contains(Self::APPEND) {
            bits &= !mode::WRITE;
            bits |= mode::APPEND;
        }
        bits
    }
}

/// Origin of an `lseek` offset.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(i32)]
pub enum Whence {
    Set = 0,
    Cur = 1,
    End = 2,
}

impl TryFrom<i32> for Whence {
    type Error = Errno;

    fn try_from(value: i32) -> Result<Self, Errno> {
        match value {
            0 => Ok(Whence::Set),
            1 => Ok(Whence::Cur),
            2 => Ok(Whence::End),
            _ => Err(Errno::EINVAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_is_mode_r() {
        assert_eq!(OpenFlags::RDONLY.host_mode(), 0);
        assert_eq!(OpenFlags::BINARY.host_mode(), 1);
    }

    #[test]
    fn test_write_modes() {
        assert_eq!(OpenFlags::WRONLY.host_mode(), 4);
        assert_eq!((OpenFlags::CREAT | OpenFlags::WRONLY).host_mode(), 4);
        assert_eq!((OpenFlags::RDWR | OpenFlags::TRUNC).host_mode(), 6);
        assert_eq!(OpenFlags::RDWR.host_mode(), 2);
    }

    #[test]
    fn test_append_clears_write() {
        let flags = OpenFlags::WRONLY | OpenFlags::CREAT | OpenFlags::APPEND;
        assert_eq!(flags.host_mode(), 8);
        let flags = OpenFlags::RDWR | OpenFlags::APPEND | OpenFlags::BINARY;
        assert_eq!(flags.host_mode(), 11);
    }

    #[test]
    fn test_whence() {
        assert_eq!(Whence::try_from(1), Ok(Whence::Cur));
        assert_eq!(Whence::try_from(3), Err(Errno::EINVAL));
        assert_eq!(Whence::try_from(-1), Err(Errno::EINVAL));
    }
}
