//! Exported entry points
//!
//! One shared [`Syscalls`] context behind a spinlock, created on first use.
//! Errors reach C through newlib's `__errno()`.

use core::ffi::{c_char, c_int, c_long, c_void, CStr};
use core::ptr;

use spin::Mutex;

use super::abi::{
    bytes, bytes_mut, c_path, count, descriptor, narrow, run, status, ticks, to_newlib,
    to_timeval, to_tms, ClockT, NewlibStat, NewlibTimeval, NewlibTimezone, NewlibTms,
};
use crate::errno::Errno;
use crate::fd::OpenFlags;
use crate::semihosting::Semihosting;
use crate::startup;
use crate::syscall::{Syscalls, TimeVal, TimeZone, Tms};

static SYSCALLS: Mutex<Option<Syscalls<Semihosting>>> = Mutex::new(None);

extern "C" {
    fn __errno() -> *mut c_int;
}

fn publish(errno: Errno) {
    // SAFETY: newlib returns the calling thread's errno slot
    unsafe { *__errno() = errno.code() };
}

fn with<R>(f: impl FnOnce(&mut Syscalls<Semihosting>) -> R) -> R {
    let mut guard = SYSCALLS.lock();
    let sys = guard.get_or_insert_with(|| Syscalls::new(Semihosting));
    run(sys, f, publish)
}

/// Open the standard streams. Called by newlib's crt0.
#[no_mangle]
pub extern "C" fn initialise_monitor_handles() {
    with(|_| ());
}

#[no_mangle]
pub unsafe extern "C" fn _open(path: *const c_char, flags: c_int, _mode: c_int) -> c_int {
    // SAFETY: Caller contract
    match unsafe { c_path(path) } {
        Ok(path) => with(|sys| descriptor(sys.open(path, OpenFlags::from_bits_retain(flags)))),
        Err(errno) => {
            publish(errno);
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn _close(fd: c_int) -> c_int {
    with(|sys| status(sys.close(fd)))
}

#[no_mangle]
pub unsafe extern "C" fn _read(fd: c_int, buf: *mut c_char, len: c_int) -> c_int {
    // SAFETY: Caller contract
    match unsafe { bytes_mut(buf, len) } {
        Ok(buf) => with(|sys| count(sys.read(fd, buf))),
        Err(errno) => {
            publish(errno);
            -1
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn _write(fd: c_int, buf: *const c_char, len: c_int) -> c_int {
    // SAFETY: Caller contract
    match unsafe { bytes(buf, len) } {
        Ok(buf) => with(|sys| count(sys.write(fd, buf))),
        Err(errno) => {
            publish(errno);
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn _lseek(fd: c_int, offset: c_long, whence: c_int) -> c_long {
    let Ok(pos) = with(|sys| sys.lseek(fd, offset as i64, whence)) else {
        return -1;
    };
    narrow(pos).unwrap_or_else(|errno| {
        publish(errno);
        -1
    })
}

#[no_mangle]
pub unsafe extern "C" fn _fstat(fd: c_int, st: *mut NewlibStat) -> c_int {
    let Ok(stat) = with(|sys| sys.fstat(fd)) else {
        return -1;
    };
    // SAFETY: Caller contract
    if let Some(out) = unsafe { st.as_mut() } {
        *out = to_newlib(&stat);
    }
    0
}

#[no_mangle]
pub unsafe extern "C" fn _stat(path: *const c_char, st: *mut NewlibStat) -> c_int {
    // SAFETY: Caller contract
    let path = match unsafe { c_path(path) } {
        Ok(path) => path,
        Err(errno) => {
            publish(errno);
            return -1;
        }
    };
    let Ok(stat) = with(|sys| sys.stat(path)) else {
        return -1;
    };
    // SAFETY: Caller contract
    if let Some(out) = unsafe { st.as_mut() } {
        *out = to_newlib(&stat);
    }
    0
}

#[no_mangle]
pub extern "C" fn _isatty(fd: c_int) -> c_int {
    with(|sys| matches!(sys.isatty(fd), Ok(true)) as c_int)
}

#[no_mangle]
pub extern "C" fn _getpid() -> c_int {
    with(|sys| sys.getpid())
}

#[no_mangle]
pub unsafe extern "C" fn _gettimeofday(tv: *mut NewlibTimeval, tz: *mut c_void) -> c_int {
    let mut time = TimeVal::default();
    let mut zone = TimeZone::default();
    let want_time = !tv.is_null();
    if with(|sys| sys.gettimeofday(want_time.then_some(&mut time), Some(&mut zone))).is_err() {
        return -1;
    }

    // SAFETY: Caller contract
    if let Some(tv) = unsafe { tv.as_mut() } {
        *tv = to_timeval(&time);
    }
    // SAFETY: Caller contract
    if let Some(tz) = unsafe { tz.cast::<NewlibTimezone>().as_mut() } {
        *tz = NewlibTimezone {
            tz_minuteswest: zone.minuteswest,
            tz_dsttime: zone.dsttime,
        };
    }
    0
}

#[no_mangle]
pub unsafe extern "C" fn _times(buf: *mut NewlibTms) -> ClockT {
    let mut tms = Tms::default();
    let now = with(|sys| sys.times(Some(&mut tms)));
    if now.is_ok() {
        // SAFETY: Caller contract
        if let Some(buf) = unsafe { buf.as_mut() } {
            *buf = to_tms(&tms);
        }
    }
    ticks(now)
}

#[no_mangle]
pub extern "C" fn _clock() -> ClockT {
    ticks(with(|sys| sys.clock()))
}

#[no_mangle]
pub unsafe extern "C" fn _unlink(path: *const c_char) -> c_int {
    // SAFETY: Caller contract
    match unsafe { c_path(path) } {
        Ok(path) => with(|sys| status(sys.unlink(path))),
        Err(errno) => {
            publish(errno);
            -1
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn _rename(from: *const c_char, to: *const c_char) -> c_int {
    // SAFETY: Caller contract
    let paths = unsafe { c_path(from).and_then(|from| Ok((from, c_path(to)?))) };
    match paths {
        Ok((from, to)) => with(|sys| status(sys.rename(from, to))),
        Err(errno) => {
            publish(errno);
            -1
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn _system(command: *const c_char) -> c_int {
    // SAFETY: Caller contract
    let command = (!command.is_null()).then(|| unsafe { CStr::from_ptr(command) });
    with(|sys| sys.system(command).unwrap_or(-1))
}

/// newlib's bare-metal libc has no `getcwd`, so the plain name is free.
#[no_mangle]
pub unsafe extern "C" fn getcwd(buf: *mut c_char, size: usize) -> *mut c_char {
    if buf.is_null() {
        publish(Errno::EINVAL);
        return ptr::null_mut();
    }
    // SAFETY: Caller contract
    let out = unsafe { core::slice::from_raw_parts_mut(buf.cast::<u8>(), size) };
    match with(|sys| sys.getcwd(out).map(|_| ())) {
        Ok(()) => buf,
        Err(_) => ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C" fn _exit(code: c_int) -> ! {
    startup::terminate(&mut Semihosting, code)
}

/// Exports that fail with `ENOSYS`. Arguments are ignored; under AAPCS a
/// caller passing them to a parameterless callee is harmless.
#[cfg(feature = "newlib-stubs")]
macro_rules! unsupported {
    ($($name:ident => $call:literal),* $(,)?) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name() -> c_int {
                with(|sys| sys.unsupported($call));
                -1
            }
        )*
    };
}

/// Like `unsupported!`, for calls returning a pointer.
#[cfg(feature = "newlib-stubs")]
macro_rules! unsupported_ptr {
    ($($name:ident => $call:literal),* $(,)?) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name() -> *mut c_void {
                with(|sys| sys.unsupported($call));
                ptr::null_mut()
            }
        )*
    };
}

// `raise` is left to libc: newlib defines it next to `signal`.
#[cfg(feature = "newlib-stubs")]
unsupported! {
    mkdir => "mkdir",
    rmdir => "rmdir",
    sync => "sync",
    chdir => "chdir",
    readdir_r => "readdir_r",
    rewinddir => "rewinddir",
    closedir => "closedir",
    socket => "socket",
    socketpair => "socketpair",
    accept => "accept",
    bind => "bind",
    connect => "connect",
    getpeername => "getpeername",
    getsockname => "getsockname",
    getsockopt => "getsockopt",
    listen => "listen",
    recv => "recv",
    recvfrom => "recvfrom",
    recvmsg => "recvmsg",
    send => "send",
    sendmsg => "sendmsg",
    sendto => "sendto",
    setsockopt => "setsockopt",
    shutdown => "shutdown",
    sockatmark => "sockatmark",
    select => "select",
    writev => "writev",
    ioctl => "ioctl",
    fcntl => "fcntl",
    ftruncate => "ftruncate",
    fsync => "fsync",
    chmod => "chmod",
    truncate => "truncate",
    utime => "utime",
    _execve => "execve",
    _fork => "fork",
    _kill => "kill",
    _wait => "wait",
    chown => "chown",
    _link => "link",
    symlink => "symlink",
    readlink => "readlink",
}

#[cfg(feature = "newlib-stubs")]
unsupported_ptr! {
    opendir => "opendir",
    readdir => "readdir",
}
