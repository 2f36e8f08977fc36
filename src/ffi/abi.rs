//! C representations and result conventions
//!
//! newlib record layouts, and the mapping from `Result` to the `-1` / null
//! sentinels C callers expect. Nothing here traps to the host, so it builds
//! and tests on any target.

use core::ffi::{c_char, c_int, c_long, c_uint, c_ulong, c_ushort, CStr};

use crate::errno::{Errno, Result};
use crate::fd::Fd;
use crate::semihosting::HostCall;
use crate::syscall::{Clock, Stat, Syscalls, TimeVal, Tms};

/// newlib `clock_t`.
pub type ClockT = c_ulong;

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Timespec {
    pub tv_sec: i64,
    pub tv_nsec: c_long,
}

/// `struct stat` from newlib's `<sys/stat.h>`.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NewlibStat {
    pub st_dev: i16,
    pub st_ino: c_ushort,
    pub st_mode: c_uint,
    pub st_nlink: c_ushort,
    pub st_uid: c_ushort,
    pub st_gid: c_ushort,
    pub st_rdev: i16,
    pub st_size: c_long,
    pub st_atim: Timespec,
    pub st_mtim: Timespec,
    pub st_ctim: Timespec,
    pub st_blksize: c_long,
    pub st_blocks: c_long,
    pub st_spare4: [c_long; 2],
}

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NewlibTimeval {
    pub tv_sec: i64,
    pub tv_usec: c_long,
}

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NewlibTimezone {
    pub tz_minuteswest: c_int,
    pub tz_dsttime: c_int,
}

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NewlibTms {
    pub tms_utime: ClockT,
    pub tms_stime: ClockT,
    pub tms_cutime: ClockT,
    pub tms_cstime: ClockT,
}

/// Run `f` on `sys`, then hand any error it recorded to `publish`.
///
/// Publication happens after the call has finished, once per call.
pub fn run<H: HostCall, const N: usize, R>(
    sys: &mut Syscalls<H, N>,
    f: impl FnOnce(&mut Syscalls<H, N>) -> R,
    publish: impl FnOnce(Errno),
) -> R {
    let result = f(sys);
    if let Some(errno) = sys.take_errno() {
        publish(errno);
    }
    result
}

pub fn status(result: Result<()>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

pub fn count(result: Result<usize>) -> c_int {
    match result {
        Ok(n) => c_int::try_from(n).unwrap_or(c_int::MAX),
        Err(_) => -1,
    }
}

pub fn descriptor(result: Result<Fd>) -> c_int {
    result.unwrap_or(-1)
}

pub fn ticks(result: Result<Clock>) -> ClockT {
    match result {
        Ok(now) => now as ClockT,
        Err(_) => ClockT::MAX,
    }
}

/// Narrow a 64-bit value to a C integer type, or fail with `EOVERFLOW`.
pub fn narrow<T: TryFrom<i64>>(value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| Errno::EOVERFLOW)
}

/// Borrow a C string argument.
///
/// # Safety
/// `path` is null or NUL-terminated.
pub unsafe fn c_path<'a>(path: *const c_char) -> Result<&'a CStr> {
    if path.is_null() {
        return Err(Errno::EINVAL);
    }
    // SAFETY: Caller contract
    Ok(unsafe { CStr::from_ptr(path) })
}

/// Borrow a C buffer argument for reading.
///
/// # Safety
/// `buf` is null or valid for reads of `len` bytes.
pub unsafe fn bytes<'a>(buf: *const c_char, len: c_int) -> Result<&'a [u8]> {
    let len = usize::try_from(len).map_err(|_| Errno::EINVAL)?;
    if len == 0 {
        return Ok(&[]);
    }
    if buf.is_null() {
        return Err(Errno::EINVAL);
    }
    // SAFETY: Caller contract
    Ok(unsafe { core::slice::from_raw_parts(buf.cast(), len) })
}

/// Borrow a C buffer argument for writing.
///
/// # Safety
/// `buf` is null or valid for writes of `len` bytes, and not aliased.
pub unsafe fn bytes_mut<'a>(buf: *mut c_char, len: c_int) -> Result<&'a mut [u8]> {
    let len = usize::try_from(len).map_err(|_| Errno::EINVAL)?;
    if len == 0 {
        return Ok(&mut []);
    }
    if buf.is_null() {
        return Err(Errno::EINVAL);
    }
    // SAFETY: Caller contract
    Ok(unsafe { core::slice::from_raw_parts_mut(buf.cast(), len) })
}

pub fn to_newlib(st: &Stat) -> NewlibStat {
    let time = |sec| Timespec {
        tv_sec: sec,
        tv_nsec: 0,
    };
    NewlibStat {
        st_dev: st.dev as i16,
        st_ino: st.ino as c_ushort,
        st_mode: st.mode.bits() as c_uint,
        st_nlink: st.nlink as c_ushort,
        st_uid: st.uid as c_ushort,
        st_gid: st.gid as c_ushort,
        st_rdev: st.rdev as i16,
        st_size: narrow(st.size).unwrap_or(c_long::MAX),
        st_atim: time(st.atime),
        st_mtim: time(st.mtime),
        st_ctim: time(st.ctime),
        st_blksize: narrow(st.blksize).unwrap_or(c_long::MAX),
        st_blocks: narrow(st.blocks).unwrap_or(c_long::MAX),
        st_spare4: [0; 2],
    }
}

pub fn to_timeval(tv: &TimeVal) -> NewlibTimeval {
    NewlibTimeval {
        tv_sec: tv.sec,
        tv_usec: tv.usec as c_long,
    }
}

pub fn to_tms(tms: &Tms) -> NewlibTms {
    NewlibTms {
        tms_utime: tms.utime as ClockT,
        tms_stime: tms.stime as ClockT,
        tms_cutime: tms.cutime as ClockT,
        tms_cstime: tms.cstime as ClockT,
    }
}
