//! Descriptor Table
//!
//! Maps POSIX file descriptors to host handles.
//!
//! # Design
//! - Fixed-size array of slots, no heap
//! - The descriptor *is* the slot index
//! - A slot is in use iff its handle is not [`FREE`]
//! - Allocation is first-fit from index 0

use crate::config::MAX_OPEN_FILES;
use crate::errno::{Errno, Result};
use crate::semihosting::Response;

/// A POSIX file descriptor.
pub type Fd = i32;

/// A host-side file handle, as returned by `SYS_OPEN`.
pub type HostHandle = Response;

/// Handle value marking a free slot.
pub const FREE: HostHandle = -1;

/// One descriptor slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OpenFile {
    /// Host handle, or [`FREE`].
    pub handle: HostHandle,
    /// Bytes consumed from the start of the file by read/write/lseek.
    pub position: i64,
}

impl OpenFile {
    /// An unused slot.
    pub const fn free() -> Self {
        Self {
            handle: FREE,
            position: 0,
        }
    }

    /// Check if the slot holds a live handle.
    #[inline]
    pub const fn in_use(&self) -> bool {
        self.handle != FREE
    }
}

/// The bounded descriptor table.
#[derive(Debug)]
pub struct FileTable<const N: usize = MAX_OPEN_FILES> {
    slots: [OpenFile; N],
}

impl<const N: usize> FileTable<N> {
    /// Create a table with every slot free.
    pub const fn new() -> Self {
        const FREE_SLOT: OpenFile = OpenFile::free();
        Self {
            slots: [FREE_SLOT; N],
        }
    }

    /// Find the lowest free slot.
    ///
    /// The slot is not claimed; call [`install`](Self::install) once the
    /// host has handed out a handle.
    pub fn allocate(&self) -> Result<Fd> {
        self.slots
            .iter()
            .position(|slot| !slot.in_use())
            .map(|index| index as Fd)
            .ok_or(Errno::EMFILE)
    }

    /// Look up a live descriptor.
    ///
    /// This is the only way to reach a slot. Negative, out-of-range and free
    /// descriptors all fail with `EBADF`.
    pub fn lookup(&mut self, fd: Fd) -> Result<&mut OpenFile> {
        let slot = usize::try_from(fd)
            .ok()
            .and_then(|index| self.slots.get_mut(index))
            .ok_or(Errno::EBADF)?;
        if slot.in_use() {
            Ok(slot)
        } else {
            Err(Errno::EBADF)
        }
    }

    /// Check if a descriptor is live.
    pub fn is_open(&self, fd: Fd) -> bool {
        usize::try_from(fd)
            .ok()
            .and_then(|index| self.slots.get(index))
            .is_some_and(OpenFile::in_use)
    }

    /// Bind a host handle to a descriptor, position zero.
    ///
    /// Negative handles leave the slot free.
    pub fn install(&mut self, fd: Fd, handle: HostHandle) {
        if handle < 0 {
            return;
        }
        if let Some(slot) = usize::try_from(fd).ok().and_then(|i| self.slots.get_mut(i)) {
            *slot = OpenFile {
                handle,
                position: 0,
            };
        }
    }

    /// Free a descriptor.
    pub fn release(&mut self, fd: Fd) {
        if let Some(slot) = usize::try_from(fd).ok().and_then(|i| self.slots.get_mut(i)) {
            slot.handle = FREE;
        }
    }

    /// Number of live descriptors.
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.in_use()).count()
    }
}

impl<const N: usize> Default for FileTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
