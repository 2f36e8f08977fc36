//! Semihosting operation numbers
//!
//! Values from "Semihosting for AArch32 and AArch64, Release 2.0".

/// An operation understood by the host, passed in `r0`/`w0`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(usize)]
pub enum Operation {
    Open = 0x01,
    Close = 0x02,
    WriteC = 0x03,
    Write0 = 0x04,
    Write = 0x05,
    Read = 0x06,
    ReadC = 0x07,
    IsError = 0x08,
    IsTty = 0x09,
    Seek = 0x0A,
    Flen = 0x0C,
    TmpNam = 0x0D,
    Remove = 0x0E,
    Rename = 0x0F,
    Clock = 0x10,
    Time = 0x11,
    System = 0x12,
    Errno = 0x13,
    GetCmdline = 0x15,
    HeapInfo = 0x16,
    Exit = 0x18,
    ExitExtended = 0x20,
    Elapsed = 0x30,
    TickFreq = 0x31,
}

impl Operation {
    /// Raw operation number.
    #[inline]
    pub const fn number(self) -> usize {
        self as usize
    }
}

/// Reason codes reported through `SYS_EXIT`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(usize)]
pub enum ExitReason {
    /// `ADP_Stopped_ApplicationExit`, used for `exit(0)`.
    ApplicationExit = (2 << 16) + 38,
    /// `ADP_Stopped_RunTimeErrorUnknown`, used for any non-zero code.
    RunTimeError = (2 << 16) + 35,
}

/// Mode bits of the `SYS_OPEN` mode field.
///
/// The host encodes the C `fopen()` mode strings: bit 0 selects binary,
/// bit 1 adds `+`, and bits 2..3 pick between "r", "w" and "a".
pub mod mode {
    /// "r"
    pub const READ: usize = 0;
    /// "b" suffix
    pub const BINARY: usize = 1 << 0;
    /// "+" suffix
    pub const PLUS: usize = 1 << 1;
    /// "w"
    pub const WRITE: usize = 1 << 2;
    /// "a"
    pub const APPEND: usize = 1 << 3;
}
