//! Clocks: gettimeofday, clock, times, elapsed ticks

use super::Syscalls;
use crate::errno::Result;
use crate::semihosting::{Argument, Field, HostCall, Operation};

/// Ticks of [`Syscalls::clock`], which runs at 100 Hz.
pub type Clock = i64;

/// Seconds and microseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TimeVal {
    pub sec: i64,
    pub usec: i64,
}

/// Timezone record; always UTC without daylight saving.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TimeZone {
    pub minuteswest: i32,
    pub dsttime: i32,
}

/// Process times.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Tms {
    pub utime: Clock,
    pub stime: Clock,
    pub cutime: Clock,
    pub cstime: Clock,
}

/// Fields needed to hold a 64-bit tick count.
const ELAPSED_FIELDS: usize = 8 / core::mem::size_of::<Field>();

impl<H: HostCall, const N: usize> Syscalls<H, N> {
    /// Current wall-clock time, at one-second resolution.
    pub fn gettimeofday(
        &mut self,
        tv: Option<&mut TimeVal>,
        tz: Option<&mut TimeZone>,
    ) -> Result<()> {
        if let Some(tv) = tv {
            // SAFETY: SYS_TIME takes no parameter
            let response = unsafe { self.call(Operation::Time, Argument::None) };
            tv.sec = self.check(response)? as i64;
            tv.usec = 0;
        }
        if let Some(tz) = tz {
            *tz = TimeZone::default();
        }
        Ok(())
    }

    /// Centiseconds since execution started.
    pub fn clock(&mut self) -> Result<Clock> {
        // SAFETY: SYS_CLOCK takes no parameter
        let response = unsafe { self.call(Operation::Clock, Argument::None) };
        Ok(self.check(response)? as Clock)
    }

    /// Process times; everything is charged to user time.
    pub fn times(&mut self, buf: Option<&mut Tms>) -> Result<Clock> {
        let now = self.clock()?;
        if let Some(buf) = buf {
            *buf = Tms {
                utime: now,
                ..Tms::default()
            };
        }
        Ok(now)
    }

    /// Target ticks since execution started.
    pub fn elapsed(&mut self) -> Result<u64> {
        let mut block = [0 as Field; ELAPSED_FIELDS];
        // SAFETY: The host fills the block in place
        let response = unsafe { self.call(Operation::Elapsed, Argument::Block(&mut block)) };
        self.check(response)?;

        let ticks = block
            .iter()
            .enumerate()
            .fold(0u64, |ticks, (i, &word)| ticks | (word as u64) << (i * Field::BITS as usize));
        Ok(ticks)
    }

    /// Frequency of [`elapsed`](Self::elapsed) in ticks per second.
    pub fn tick_frequency(&mut self) -> Result<i64> {
        // SAFETY: SYS_TICKFREQ takes no parameter
        let response = unsafe { self.call(Operation::TickFreq, Argument::None) };
        Ok(self.check(response)? as i64)
    }
}
