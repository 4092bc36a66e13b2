//! System report assembled from register reads and supervisor queries.

use ctr_common::config::ConsoleModel;
use ctr_common::version::SystemVersion;
use ctr_os::memory::{region_usage, MemRegion, MemoryUsage};
use ctr_os::mmio::RegisterBus;
use ctr_os::registers::SystemRegisters;
use ctr_os::svc::Supervisor;
use ctr_os::time::{current_time_ms, to_unix_ms};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, UNIX_EPOCH};

/// Snapshot of everything the probe can read.
#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    /// Hardware model.
    pub model: ConsoleModel,
    /// Kernel version.
    pub kernel_version: SystemVersion,
    /// FIRM version.
    pub firm_version: SystemVersion,
    /// Core version.
    pub core_version: u32,
    /// Memory layout id.
    pub app_mem_type: u32,
    /// Wi-Fi bars.
    pub wifi_strength: u8,
    /// 3D slider position.
    pub slider_3d: f32,
    /// Per-region accounting, `all` first.
    pub memory: Vec<MemoryUsage>,
    /// Milliseconds since 1900-01-01.
    pub time_ms: u64,
    /// Milliseconds since the Unix epoch.
    pub unix_time_ms: u64,
}

impl SystemReport {
    /// Read a report from `regs` and `svc`.
    pub fn collect<B, S>(model: ConsoleModel, regs: &SystemRegisters<B>, svc: &S) -> Self
    where
        B: RegisterBus,
        S: Supervisor,
    {
        let memory = [MemRegion::All]
            .into_iter()
            .chain(MemRegion::CONCRETE)
            .map(|region| region_usage(regs, svc, region))
            .collect();
        let time_ms = current_time_ms(regs, svc);

        Self {
            model,
            kernel_version: regs.kernel(),
            firm_version: regs.firm(),
            core_version: regs.core_version(),
            app_mem_type: regs.application_mem_type(),
            wifi_strength: regs.wifi_strength(),
            slider_3d: regs.slider_3d(),
            memory,
            time_ms,
            unix_time_ms: to_unix_ms(time_ms),
        }
    }
}

impl fmt::Display for SystemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model:          {:?}", self.model)?;
        writeln!(f, "kernel version: {}", self.kernel_version)?;
        writeln!(f, "firm version:   {}", self.firm_version)?;
        writeln!(f, "core version:   {}", self.core_version)?;
        writeln!(f, "app mem type:   {}", self.app_mem_type)?;
        writeln!(f, "wifi strength:  {}/3", self.wifi_strength)?;
        writeln!(f, "3d slider:      {:.2}", self.slider_3d)?;
        let time = UNIX_EPOCH + Duration::from_millis(self.unix_time_ms);
        writeln!(f, "time:           {}", humantime::format_rfc3339_millis(time))?;
        writeln!(f, "memory:")?;
        for m in &self.memory {
            writeln!(
                f,
                "  {:<12} size {:>10}  used {:>10}  free {:>10}  ({:.1}%)",
                m.region.to_string(),
                m.size,
                m.used,
                m.free,
                m.utilization() * 100.0
            )?;
        }
        Ok(())
    }
}
