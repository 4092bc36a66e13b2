//! Supervisor call capability.
//!
//! Code that needs a privileged query takes a [`Supervisor`] instead of
//! issuing the call itself. On the console [`Svc`] issues the real
//! instructions; elsewhere [`SimulatedConsole`](crate::sim::SimulatedConsole)
//! stands in.

use crate::tick::TickSource;
use ctr_common::result::ResultCode;

/// `svcGetSystemInfo` query types.
pub mod system_info {
    /// Bytes in use in a memory region; the parameter is the region.
    pub const MEMORY_USED: u32 = 0;
    /// Number of processes launched directly by the kernel.
    pub const PROCESS_COUNT: u32 = 26;
}

/// Privileged kernel queries.
///
/// The system tick (`svcGetSystemTick`) comes from the [`TickSource`]
/// supertrait.
pub trait Supervisor: TickSource {
    /// `svcGetSystemInfo`: query kernel state of `kind` with `param`.
    ///
    /// # Errors
    ///
    /// Returns the kernel's result code when the query is rejected.
    fn system_info(&self, kind: u32, param: i32) -> Result<i64, ResultCode>;
}

/// Direct supervisor calls of the running Horizon process.
#[derive(Debug, Clone, Copy, Default)]
pub struct Svc;

#[cfg(all(target_os = "horizon", target_arch = "arm"))]
#[allow(unsafe_code)]
mod horizon {
    use super::{ResultCode, Supervisor, Svc, TickSource};
    use core::arch::asm;

    impl TickSource for Svc {
        fn ticks(&self) -> u64 {
            let lo: u32;
            let hi: u32;
            // SAFETY: svcGetSystemTick takes no arguments and only writes r0/r1.
            unsafe {
                asm!(
                    "svc 0x28",
                    out("r0") lo,
                    out("r1") hi,
                    out("r2") _,
                    out("r3") _,
                    options(nomem, nostack),
                );
            }
            (u64::from(hi) << 32) | u64::from(lo)
        }
    }

    impl Supervisor for Svc {
        fn system_info(&self, kind: u32, param: i32) -> Result<i64, ResultCode> {
            let rc: i32;
            let lo: u32;
            let hi: u32;
            // SAFETY: svcGetSystemInfo reads its arguments from r1/r2 and
            // returns the result in r0 and the value in r1/r2.
            unsafe {
                asm!(
                    "svc 0x2A",
                    inout("r1") kind => lo,
                    inout("r2") param as u32 => hi,
                    out("r0") rc,
                    out("r3") _,
                    options(nostack),
                );
            }
            ResultCode(rc).into_result()?;
            Ok(((u64::from(hi) << 32) | u64::from(lo)) as i64)
        }
    }
}
