//! Process startup and termination
//!
//! # Command line
//! The host hands over the whole command line as one string. It is split on
//! blanks; single or double quotes group an argument containing blanks.
//!
//! # Termination
//! `SYS_EXIT` reports the outcome to the debugger. If the host lets
//! execution continue anyway, the CPU is parked.

use heapless::Vec;

use crate::config::{ARGS_BUF_SIZE, MAX_ARGS};
use crate::semihosting::{halt, Argument, ExitReason, Field, HostCall, Operation};

/// The tokenized command line.
#[derive(Debug, Clone)]
pub struct CommandLine {
    buf: [u8; ARGS_BUF_SIZE],
    /// `(start, end)` byte ranges into `buf`.
    args: Vec<(usize, usize), MAX_ARGS>,
}

impl CommandLine {
    /// Fetch and tokenize the command line from the host.
    ///
    /// If the host has none, the result is a single empty program name.
    pub fn fetch<H: HostCall>(host: &mut H) -> Self {
        let mut buf = [0u8; ARGS_BUF_SIZE];
        let mut block = [buf.as_mut_ptr() as Field, ARGS_BUF_SIZE - 1];
        // SAFETY: The host writes at most `ARGS_BUF_SIZE - 1` bytes plus a
        // terminator into `buf`, which outlives the call
        let response = unsafe { host.call_host(Operation::GetCmdline, Argument::Block(&mut block)) };

        if response != 0 {
            buf[0] = 0;
        }
        buf[ARGS_BUF_SIZE - 1] = 0;
        Self::tokenize(buf)
    }

    /// Tokenize a command line held in memory.
    ///
    /// Input past the buffer size is dropped.
    pub fn parse(line: &[u8]) -> Self {
        let mut buf = [0u8; ARGS_BUF_SIZE];
        let n = line.len().min(ARGS_BUF_SIZE - 1);
        buf[..n].copy_from_slice(&line[..n]);
        Self::tokenize(buf)
    }

    fn tokenize(buf: [u8; ARGS_BUF_SIZE]) -> Self {
        let len = buf.iter().position(|&b| b == 0).unwrap_or(ARGS_BUF_SIZE);
        let mut args: Vec<(usize, usize), MAX_ARGS> = Vec::new();
        let mut i = 0;

        while i < len {
            if is_blank(buf[i]) {
                i += 1;
                continue;
            }
            if args.is_full() {
                break;
            }

            let delim = match buf[i] {
                quote @ (b'"' | b'\'') => {
                    i += 1;
                    Some(quote)
                }
                _ => None,
            };

            let start = i;
            while i < len {
                let ch = buf[i];
                match delim {
                    Some(quote) if ch == quote => break,
                    None if is_blank(ch) => break,
                    _ => i += 1,
                }
            }
            // Cannot fail; fullness was checked above.
            let _ = args.push((start, i));
            // Step over the terminating blank or quote.
            i += 1;
        }

        if args.is_empty() {
            let _ = args.push((0, 0));
        }
        Self { buf, args }
    }

    /// Number of arguments, program name included.
    #[inline]
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// The `index`th argument.
    pub fn arg(&self, index: usize) -> Option<&[u8]> {
        self.args.get(index).map(|&(start, end)| &self.buf[start..end])
    }

    /// All arguments in order.
    pub fn args(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.args.iter().map(|&(start, end)| &self.buf[start..end])
    }
}

#[inline]
fn is_blank(ch: u8) -> bool {
    ch == b' ' || ch == b'\t'
}

/// Report termination to the host without stopping.
///
/// On 32-bit targets only success or failure can be reported; 64-bit
/// targets pass the exit code itself.
pub fn report_exit<H: HostCall>(host: &mut H, code: i32) {
    #[cfg(target_pointer_width = "64")]
    {
        let mut block = [ExitReason::ApplicationExit as Field, code as Field];
        // SAFETY: Block holds no pointers
        unsafe { host.call_host(Operation::Exit, Argument::Block(&mut block)) };
    }

    #[cfg(not(target_pointer_width = "64"))]
    {
        let reason = if code == 0 {
            ExitReason::ApplicationExit
        } else {
            ExitReason::RunTimeError
        };
        // SAFETY: The argument is a reason code, not a pointer
        unsafe { host.call_host(Operation::Exit, Argument::Word(reason as Field)) };
    }

    log::debug!("exit({}) returned from host", code);
}

/// Terminate the program.
pub fn terminate<H: HostCall>(host: &mut H, code: i32) -> ! {
    report_exit(host, code);
    halt()
}
