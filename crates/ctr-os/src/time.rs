//! Wall-clock time from the shared page.
//!
//! The kernel publishes the RTC-derived date in milliseconds since
//! 1900-01-01 along with the tick at which it was written. The current time
//! is that value advanced by the ticks elapsed since.

use crate::mmio::RegisterBus;
use crate::registers::SystemRegisters;
use crate::tick::TickSource;
use ctr_common::clock::CPU_TICKS_PER_MSEC;

/// Milliseconds between 1900-01-01 and the Unix epoch.
pub const EPOCH_1900_TO_1970_MS: u64 = 2_208_988_800_000;

/// Current time in milliseconds since 1900-01-01 00:00.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn current_time_ms<B, T>(regs: &SystemRegisters<B>, ticks: &T) -> u64
where
    B: RegisterBus,
    T: TickSource + ?Sized,
{
    let record = regs.datetime();
    let elapsed = ticks.ticks().wrapping_sub(record.update_tick);
    let offset = (elapsed as f64 / CPU_TICKS_PER_MSEC) as u64;
    record.date_time.wrapping_add(offset)
}

/// Shift milliseconds since 1900 to the Unix epoch, saturating at zero for
/// dates before 1970.
#[must_use]
pub const fn to_unix_ms(ms_since_1900: u64) -> u64 {
    ms_since_1900.saturating_sub(EPOCH_1900_TO_1970_MS)
}

/// Current time in milliseconds since the Unix epoch.
///
/// Saturates at zero for dates before 1970.
#[must_use]
pub fn unix_time_ms<B, T>(regs: &SystemRegisters<B>, ticks: &T) -> u64
where
    B: RegisterBus,
    T: TickSource + ?Sized,
{
    to_unix_ms(current_time_ms(regs, ticks))
}
