//! New 3DS CPU speedup control.

use ctr_common::error::{OsError, OsResult};
use ctr_common::result::ResultCode;
use tracing::{debug, warn};

/// Clock the ARM11 cores at 804 MHz.
pub const CPU_FLAG_HIGH_CLOCK: u8 = 1 << 0;
/// Enable the L2 cache.
pub const CPU_FLAG_L2_CACHE: u8 = 1 << 1;

/// The system-module call that reconfigures the New 3DS CPU.
pub trait CpuSpeedup {
    /// Apply `flags` (a combination of `CPU_FLAG_*`).
    ///
    /// # Errors
    ///
    /// Returns the service result code when the request is rejected or the
    /// service is unavailable.
    fn configure_new3ds_cpu(&self, flags: u8) -> Result<(), ResultCode>;
}

/// CPU flags for the requested speedup state.
#[must_use]
pub const fn speedup_flags(enable: bool) -> u8 {
    if enable {
        CPU_FLAG_HIGH_CLOCK | CPU_FLAG_L2_CACHE
    } else {
        0
    }
}

/// Enable or disable the speedup, surfacing failure.
///
/// # Errors
///
/// Returns [`OsError::Service`] if the system module rejects the request.
pub fn try_set_speedup_enable<C: CpuSpeedup + ?Sized>(cpu: &C, enable: bool) -> OsResult<()> {
    let flags = speedup_flags(enable);
    debug!(enable, flags, "Configuring New 3DS CPU");
    cpu.configure_new3ds_cpu(flags)
        .map_err(|code| OsError::service("PTMSYSM_ConfigureNew3DSCPU", code))
}

/// Enable or disable the speedup.
///
/// Has no effect on the original model, where the service call fails; the
/// failure is logged and otherwise ignored.
pub fn set_speedup_enable<C: CpuSpeedup + ?Sized>(cpu: &C, enable: bool) {
    if let Err(e) = try_set_speedup_enable(cpu, enable) {
        warn!(enable, error = %e, "Speedup configuration failed");
    }
}
