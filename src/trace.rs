//! Trace Output
//!
//! Diagnostic text sent straight to the host, below the descriptor layer.
//! Nothing here goes through [`Syscalls`](crate::Syscalls), so tracing never
//! touches errno or the descriptor table.
//!
//! # Channels
//! - `Debug`: the debugger console via `SYS_WRITE0`, in short NUL-terminated
//!   chunks
//! - `Stdout`: a private `:tt` handle opened on first use
//!
//! [`TraceLogger`] backs the `log` facade with a [`Trace`] behind a spinlock.
//! The write path itself must never log.

use core::fmt::{self, Write};

use heapless::String;
use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::config::{TELETYPE, TRACE_CHUNK, TRACE_LINE};
use crate::errno::{Errno, Result};
use crate::fd::HostHandle;
use crate::semihosting::{mode, transferred, Argument, Field, HostCall, Operation};

/// Where trace output goes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Channel {
    Debug,
    Stdout,
}

/// A trace sink bound to one host.
#[derive(Debug)]
pub struct Trace<H: HostCall> {
    host: H,
    channel: Channel,
    handle: Option<HostHandle>,
}

impl<H: HostCall> Trace<H> {
    pub const fn new(host: H, channel: Channel) -> Self {
        Self {
            host,
            channel,
            handle: None,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Send `bytes` to the host.
    ///
    /// Returns the number of bytes accepted. Fails with `EIO` if the host
    /// took nothing.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        match self.channel {
            Channel::Debug => {
                self.write_debug(bytes);
                Ok(bytes.len())
            }
            Channel::Stdout => self.write_stdout(bytes),
        }
    }

    fn write_debug(&mut self, bytes: &[u8]) {
        let mut chunk = [0u8; TRACE_CHUNK];
        for piece in bytes.chunks(TRACE_CHUNK - 1) {
            chunk[..piece.len()].copy_from_slice(piece);
            chunk[piece.len()] = 0;
            // SAFETY: `chunk` is NUL-terminated and outlives the call
            unsafe {
                self.host
                    .call_host(Operation::Write0, Argument::Word(chunk.as_ptr() as Field))
            };
        }
    }

    fn write_stdout(&mut self, bytes: &[u8]) -> Result<usize> {
        if bytes.is_empty() {
            return Ok(0);
        }
        let handle = self.stdout_handle()?;
        let mut block = [handle as Field, bytes.as_ptr() as Field, bytes.len()];
        // SAFETY: `bytes` outlives the call
        let response = unsafe { self.host.call_host(Operation::Write, Argument::Block(&mut block)) };
        match transferred(bytes.len(), response) {
            Some(n) if n > 0 => Ok(n),
            _ => Err(Errno::EIO),
        }
    }

    fn stdout_handle(&mut self) -> Result<HostHandle> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }
        let mut block = [
            TELETYPE.as_ptr() as Field,
            mode::WRITE,
            TELETYPE.to_bytes().len(),
        ];
        // SAFETY: `TELETYPE` is static
        let handle = unsafe { self.host.call_host(Operation::Open, Argument::Block(&mut block)) };
        if handle < 0 {
            return Err(Errno::EIO);
        }
        self.handle = Some(handle);
        Ok(handle)
    }
}

impl<H: HostCall> Write for Trace<H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s.as_bytes();
        while !rest.is_empty() {
            let n = self.write(rest).map_err(|_| fmt::Error)?;
            rest = &rest[n..];
        }
        Ok(())
    }
}

/// `log` backend writing one line per record.
pub struct TraceLogger<H: HostCall> {
    trace: Mutex<Trace<H>>,
    level: LevelFilter,
}

impl<H: HostCall> TraceLogger<H> {
    pub const fn new(host: H, channel: Channel, level: LevelFilter) -> Self {
        Self {
            trace: Mutex::new(Trace::new(host, channel)),
            level,
        }
    }
}

impl<H: HostCall + Send> Log for TraceLogger<H> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Long records are cut at the line buffer.
        let mut line: String<TRACE_LINE> = String::new();
        let _ = write!(
            line,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );

        let mut trace = self.trace.lock();
        let _ = trace.write_str(&line);
        let _ = trace.write_str("\n");
    }

    fn flush(&self) {}
}

/// Install `logger` as the global `log` backend.
pub fn init<H: HostCall + Send>(
    logger: &'static TraceLogger<H>,
) -> core::result::Result<(), log::SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semihosting::mock::MockHost;
    use log::Level;

    #[test]
    fn test_debug_channel_chunks_output() {
        let mut trace = Trace::new(MockHost::new(), Channel::Debug);
        let text = b"a line longer than one trace chunk\n";
        assert_eq!(trace.write(text), Ok(text.len()));

        let host = trace.host();
        assert_eq!(host.debug, text);
        assert_eq!(host.count(Operation::Write0), text.len().div_ceil(TRACE_CHUNK - 1));
    }

    #[test]
    fn test_stdout_channel_opens_once() {
        let mut trace = Trace::new(MockHost::new(), Channel::Stdout);
        assert_eq!(trace.write(b"one "), Ok(4));
        assert_eq!(trace.write(b"two"), Ok(3));
        assert_eq!(trace.write(b""), Ok(0));

        let host = trace.host();
        assert_eq!(host.console, b"one two");
        assert_eq!(host.count(Operation::Open), 1);
        assert_eq!(host.count(Operation::Errno), 0);
    }

    #[test]
    fn test_stdout_channel_refused() {
        let mut host = MockHost::new();
        host.refuse_writes = true;
        let mut trace = Trace::new(host, Channel::Stdout);
        assert_eq!(trace.write(b"lost"), Err(Errno::EIO));
    }

    #[test]
    fn test_logger_formats_and_filters() {
        let logger = TraceLogger::new(MockHost::new(), Channel::Debug, LevelFilter::Info);

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("semiposix::syscall")
                .args(format_args!("close({}) EBADF", 7))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Trace)
                .target("semiposix::syscall")
                .args(format_args!("dropped"))
                .build(),
        );

        let trace = logger.trace.lock();
        assert_eq!(trace.host().debug, b"[WARN semiposix::syscall] close(7) EBADF\n");
    }
}
