//! System clock rates and tick conversions.
//!
//! The system tick counter runs at the ARM11 core clock of the original
//! model. The New 3DS can clock its cores three times faster, but the tick
//! counter keeps the base rate.

use std::time::Duration;

/// SoC base clock in Hz.
pub const SYSCLOCK_SOC: u32 = 16_756_991;

/// ARM9 clock in Hz.
pub const SYSCLOCK_ARM9: u32 = SYSCLOCK_SOC * 8;

/// ARM11 clock in Hz; the system tick rate.
pub const SYSCLOCK_ARM11: u32 = SYSCLOCK_ARM9 * 2;

/// ARM11 clock on the New 3DS in high-speed mode, in Hz.
pub const SYSCLOCK_ARM11_NEW: u32 = SYSCLOCK_ARM11 * 3;

/// System ticks per millisecond.
pub const CPU_TICKS_PER_MSEC: f64 = SYSCLOCK_ARM11 as f64 / 1000.0;

/// System ticks per microsecond.
pub const CPU_TICKS_PER_USEC: f64 = SYSCLOCK_ARM11 as f64 / 1_000_000.0;

/// Convert a tick count to fractional milliseconds.
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ticks_to_ms(ticks: u64) -> f64 {
    ticks as f64 / CPU_TICKS_PER_MSEC
}

/// Convert a tick count to a [`Duration`], truncating to whole nanoseconds.
#[must_use]
pub fn ticks_to_duration(ticks: u64) -> Duration {
    let hz = u128::from(SYSCLOCK_ARM11);
    let nanos = u128::from(ticks) * 1_000_000_000 / hz;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Convert a [`Duration`] to system ticks, truncating partial ticks.
#[must_use]
pub fn duration_to_ticks(duration: Duration) -> u64 {
    let ticks = duration.as_nanos() * u128::from(SYSCLOCK_ARM11) / 1_000_000_000;
    u64::try_from(ticks).unwrap_or(u64::MAX)
}
