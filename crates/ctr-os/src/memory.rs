//! Physical memory region accounting.
//!
//! Sizes come from the config memory; usage needs a supervisor call.

use crate::mmio::RegisterBus;
use crate::registers::SystemRegisters;
use crate::svc::{system_info, Supervisor};
use ctr_common::error::{OsError, OsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Physical memory regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum MemRegion {
    /// All regions combined.
    All = 0,
    /// Application region.
    Application = 1,
    /// System region.
    System = 2,
    /// Base region.
    Base = 3,
}

impl MemRegion {
    /// The three concrete regions, in config-memory order.
    pub const CONCRETE: [MemRegion; 3] = [Self::Application, Self::System, Self::Base];

    /// Decode a raw region selector.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::All),
            1 => Some(Self::Application),
            2 => Some(Self::System),
            3 => Some(Self::Base),
            _ => None,
        }
    }
}

impl fmt::Display for MemRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Application => write!(f, "application"),
            Self::System => write!(f, "system"),
            Self::Base => write!(f, "base"),
        }
    }
}

/// Size of `region` in bytes.
#[inline]
pub fn region_size<B: RegisterBus>(regs: &SystemRegisters<B>, region: MemRegion) -> u32 {
    regs.mem_region_size(region)
}

/// Bytes used in `region`, surfacing the supervisor's failure.
///
/// # Errors
///
/// Returns [`OsError::Service`] if `svcGetSystemInfo` fails, or
/// [`OsError::OutOfRange`] if the kernel reports a count that does not fit a word.
pub fn try_region_used<S: Supervisor + ?Sized>(svc: &S, region: MemRegion) -> OsResult<u32> {
    let used = svc
        .system_info(system_info::MEMORY_USED, region as i32)
        .map_err(|code| OsError::service("svcGetSystemInfo", code))?;
    u32::try_from(used).map_err(|_| OsError::OutOfRange {
        what: "memory used",
        value: used as u64,
    })
}

/// Bytes used in `region`.
///
/// The query is treated as infallible: a failure is logged and reported as 0.
pub fn region_used<S: Supervisor + ?Sized>(svc: &S, region: MemRegion) -> u32 {
    match try_region_used(svc, region) {
        Ok(used) => used,
        Err(e) => {
            warn!(%region, error = %e, "Memory usage query failed");
            0
        }
    }
}

/// Bytes free in `region`: size minus used, in word arithmetic.
pub fn region_free<B, S>(regs: &SystemRegisters<B>, svc: &S, region: MemRegion) -> u32
where
    B: RegisterBus,
    S: Supervisor + ?Sized,
{
    region_size(regs, region).wrapping_sub(region_used(svc, region))
}

/// Size, usage and free space of one region at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// Region.
    pub region: MemRegion,
    /// Size in bytes.
    pub size: u32,
    /// Used bytes.
    pub used: u32,
    /// Free bytes.
    pub free: u32,
}

impl MemoryUsage {
    /// Used fraction of the region (0.0 when the region is empty).
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            f64::from(self.used) / f64::from(self.size)
        }
    }
}

/// Snapshot of `region` with a single usage query.
pub fn region_usage<B, S>(regs: &SystemRegisters<B>, svc: &S, region: MemRegion) -> MemoryUsage
where
    B: RegisterBus,
    S: Supervisor + ?Sized,
{
    let size = region_size(regs, region);
    let used = region_used(svc, region);
    MemoryUsage {
        region,
        size,
        used,
        free: size.wrapping_sub(used),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimulatedBus, SimulatedConsole};
    use ctr_common::config::SimulationConfig;
    use ctr_common::result::ResultCode;

    fn setup() -> (SystemRegisters<SimulatedBus>, SimulatedConsole) {
        let config = SimulationConfig::default();
        let bus = SimulatedBus::from_config(&config);
        (SystemRegisters::new(bus), SimulatedConsole::from_config(&config))
    }

    #[test]
    fn test_region_accounting() {
        let (regs, console) = setup();
        let sim = SimulationConfig::default();

        assert_eq!(
            region_size(&regs, MemRegion::Application),
            sim.region_sizes.application
        );
        assert_eq!(
            region_used(&console, MemRegion::Application),
            sim.region_used.application
        );
        assert_eq!(
            region_free(&regs, &console, MemRegion::Application),
            sim.region_sizes.application - sim.region_used.application
        );
    }

    #[test]
    fn test_all_region_sums_concrete_regions() {
        let (regs, console) = setup();
        let size: u32 = MemRegion::CONCRETE
            .iter()
            .map(|&r| region_size(&regs, r))
            .sum();
        let used: u32 = MemRegion::CONCRETE
            .iter()
            .map(|&r| region_used(&console, r))
            .sum();
        assert_eq!(region_size(&regs, MemRegion::All), size);
        assert_eq!(region_used(&console, MemRegion::All), used);
        assert_eq!(region_free(&regs, &console, MemRegion::All), size - used);
    }

    #[test]
    fn test_failed_usage_query_reads_as_zero() {
        let (regs, console) = setup();
        console.fail_system_info(ResultCode::from_raw(0xD8E0_07ED));

        assert!(matches!(
            try_region_used(&console, MemRegion::System),
            Err(OsError::Service { code, .. }) if code.raw() == 0xD8E0_07ED
        ));
        assert_eq!(region_used(&console, MemRegion::System), 0);
        assert_eq!(
            region_free(&regs, &console, MemRegion::System),
            region_size(&regs, MemRegion::System)
        );
    }

    #[test]
    fn test_usage_snapshot() {
        let (regs, console) = setup();
        let snap = region_usage(&regs, &console, MemRegion::Base);
        assert_eq!(snap.size - snap.used, snap.free);
        assert!(snap.utilization() > 0.0 && snap.utilization() < 1.0);
        assert_eq!(snap.region.to_string(), "base");
    }

    #[test]
    fn test_region_selector_decoding() {
        assert_eq!(MemRegion::from_raw(2), Some(MemRegion::System));
        assert_eq!(MemRegion::from_raw(4), None);
        assert_eq!(MemRegion::Base as u32, 3);
    }
}
