//! Semihosting trap
//!
//! # Trap instructions
//! - AArch64: `HLT #0xF000`
//! - AArch32 M-profile: `BKPT #0xAB`
//!
//! The operation goes in `x0`/`r0`, the argument in `x1`/`r1`, and the host
//! answers in `x0`/`r0`. Without a debugger attached the trap faults.

use core::arch::asm;

use super::host::{Argument, Field, HostCall, Response};
use super::op::Operation;

/// The hardware gateway to an attached debugger or emulator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Semihosting;

impl HostCall for Semihosting {
    unsafe fn call_host(&mut self, op: Operation, mut arg: Argument<'_>) -> Response {
        let param = arg.register();
        // SAFETY: Caller guarantees every pointer reachable from `arg` is
        // valid for this operation. `arg` keeps the block borrowed until
        // the trap returns.
        // Audited: 2025-01-04
        unsafe { trap(op.number(), param) }
    }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
unsafe fn trap(op: Field, param: Field) -> Response {
    let ret: Field;
    // SAFETY: The host only touches memory described by `param`
    unsafe {
        asm!(
            "hlt #0xf000",
            inout("x0") op => ret,
            in("x1") param,
            options(nostack),
        );
    }
    ret as Response
}

#[cfg(target_arch = "arm")]
#[inline(always)]
unsafe fn trap(op: Field, param: Field) -> Response {
    let ret: Field;
    // SAFETY: The host only touches memory described by `param`
    unsafe {
        asm!(
            "bkpt #0xab",
            inout("r0") op => ret,
            in("r1") param,
            options(nostack),
        );
    }
    ret as Response
}

/// Halt the CPU in a low-power state.
pub fn halt() -> ! {
    loop {
        // SAFETY: WFI is always safe to execute
        // Audited: 2025-01-04
        unsafe {
            asm!("wfi", options(nomem, nostack));
        }
    }
}
