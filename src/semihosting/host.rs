//! Host Gateway
//!
//! The single entry point into the debugger. Everything above this trait is
//! plain Rust; everything below it is a trapped instruction.

use super::op::Operation;

/// A register-sized parameter block field.
pub type Field = usize;

/// Signed register-sized host response.
pub type Response = isize;

/// What gets passed in the parameter register.
#[derive(Debug)]
pub enum Argument<'a> {
    /// A null parameter.
    None,
    /// Pointer to a parameter block. The host may write fields back.
    Block(&'a mut [Field]),
    /// A raw register value, for operations that take a value or a pointer
    /// to a string instead of a block.
    Word(Field),
}

impl Argument<'_> {
    /// Value that ends up in the parameter register.
    pub fn register(&mut self) -> Field {
        match self {
            Argument::None => 0,
            Argument::Block(fields) => fields.as_mut_ptr() as Field,
            Argument::Word(word) => *word,
        }
    }
}

/// Decode a `SYS_READ`/`SYS_WRITE` response.
///
/// The host answers with the number of bytes *not* transferred. Returns the
/// number actually moved, or `None` if the response is not a count within
/// `0..=requested`.
#[inline]
pub fn transferred(requested: usize, not_transferred: Response) -> Option<usize> {
    let left = usize::try_from(not_transferred).ok()?;
    requested.checked_sub(left)
}

/// The semihosting gateway.
///
/// Implementations forward `(operation, argument)` to the host and return
/// its response unchanged. The host protocol has no inline error codes; a
/// failure is a sentinel in the response, and the cause is fetched with
/// [`Operation::Errno`].
pub trait HostCall {
    /// Perform one host operation.
    ///
    /// # Safety
    /// Every pointer carried in `arg` (the block itself, and any pointer
    /// fields inside it) must reference memory that is valid, for the
    /// access the operation performs, for the duration of the call.
    unsafe fn call_host(&mut self, op: Operation, arg: Argument<'_>) -> Response;
}

impl<H: HostCall + ?Sized> HostCall for &mut H {
    unsafe fn call_host(&mut self, op: Operation, arg: Argument<'_>) -> Response {
        // SAFETY: Forwarded contract
        unsafe { (**self).call_host(op, arg) }
    }
}
