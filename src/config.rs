//! Compile-time configuration
//!
//! All limits are fixed at build time; nothing here is allocated on a heap.

/// Maximum number of concurrently open descriptors, standard streams included.
pub const MAX_OPEN_FILES: usize = 20;

/// Descriptors 0, 1 and 2 are claimed by the standard streams.
pub const STD_STREAMS: usize = 3;

/// Size of the buffer receiving the command line from the host.
pub const ARGS_BUF_SIZE: usize = 80;

/// Capacity of the argv array, including the terminating null entry.
pub const ARGV_BUF_SIZE: usize = 10;

/// Largest number of arguments the tokenizer will produce.
pub const MAX_ARGS: usize = ARGV_BUF_SIZE - 1;

/// Chunk size used by the debug trace channel (terminator included).
pub const TRACE_CHUNK: usize = 16;

/// Longest trace line formatted before emission.
pub const TRACE_LINE: usize = 128;

/// Block size reported by `fstat`/`stat`.
pub const STAT_BLOCK_SIZE: i64 = 1024;

/// Host pseudo-file backing the standard streams.
pub const TELETYPE: &core::ffi::CStr = c":tt";

/// Working directory reported by `getcwd`; the host has no such concept.
pub const FALLBACK_CWD: &core::ffi::CStr = c"/tmp";
