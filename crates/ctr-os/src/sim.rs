//! Simulated console backends.
//!
//! Deterministic stand-ins for the register pages, the tick counter, the
//! supervisor, and the version records. Used by tests and by host tooling
//! that runs the platform layer off-device.

use crate::memory::MemRegion;
use crate::mmio::RegisterBus;
use crate::registers::{
    APP_MEMTYPE_ADDR, CORE_VERSION_ADDR, DATETIME_0_ADDR, DATETIME_1_ADDR,
    DATETIME_SELECTOR_ADDR, FIRM_VERSION_ADDR, KERNEL_VERSION_ADDR, MEM_REGION_SIZES_ADDR,
    SLIDER_3D_ADDR, WIFI_STRENGTH_ADDR,
};
use crate::speedup::CpuSpeedup;
use crate::svc::{system_info, Supervisor};
use crate::sysver::{VersionBin, VersionError, VersionRecord, VersionStorage};
use crate::tick::TickSource;
use ctr_common::config::{ConsoleModel, RegionBytes, SimulationConfig};
use ctr_common::result::{description, Level, ResultCode, Summary};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Kernel module id in result codes.
const MODULE_KERNEL: u8 = 1;
/// PTM module id in result codes.
const MODULE_PTM: u8 = 0x1C;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sparse little-endian byte image of the address space.
///
/// Unwritten bytes read as zero. Multi-byte accesses wrap at the top of the
/// address space.
#[derive(Debug, Default)]
pub struct SimulatedBus {
    bytes: Mutex<BTreeMap<u32, u8>>,
}

impl SimulatedBus {
    /// An empty image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An image holding the config memory and shared page described by `config`.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        let bus = Self::new();
        bus.write_u32(KERNEL_VERSION_ADDR, config.kernel_version.raw());
        bus.write_u32(FIRM_VERSION_ADDR, config.firm_version.raw());
        bus.write_u32(CORE_VERSION_ADDR, config.core_version);
        bus.write_u32(APP_MEMTYPE_ADDR, config.app_mem_type);
        bus.write_region_sizes(config.region_sizes);
        bus.write_u8(WIFI_STRENGTH_ADDR, config.wifi_strength);
        bus.write_f32(SLIDER_3D_ADDR, config.slider_3d);
        bus.publish_datetime(config.datetime_ms, config.start_tick);
        bus
    }

    /// Write the three region sizes into the config memory.
    pub fn write_region_sizes(&self, sizes: RegionBytes) {
        self.write_u32(MEM_REGION_SIZES_ADDR, sizes.application);
        self.write_u32(MEM_REGION_SIZES_ADDR + 4, sizes.system);
        self.write_u32(MEM_REGION_SIZES_ADDR + 8, sizes.base);
    }

    /// Publish a date/time record the way the kernel does: write the inactive
    /// record, then bump the selector to make it active.
    pub fn publish_datetime(&self, date_time: u64, update_tick: u64) {
        let selector = self.read_u32(DATETIME_SELECTOR_ADDR);
        let next = selector.wrapping_add(1);
        let addr = if next & 1 == 0 {
            DATETIME_0_ADDR
        } else {
            DATETIME_1_ADDR
        };
        self.write_u64(addr, date_time);
        self.write_u64(addr + 8, update_tick);
        self.write_u32(DATETIME_SELECTOR_ADDR, next);
    }

    /// Write one byte.
    pub fn write_u8(&self, addr: u32, value: u8) {
        lock(&self.bytes).insert(addr, value);
    }

    /// Write a little-endian word.
    pub fn write_u32(&self, addr: u32, value: u32) {
        self.write_bytes(addr, &value.to_le_bytes());
    }

    /// Write a 64-bit value as two little-endian words.
    pub fn write_u64(&self, addr: u32, value: u64) {
        self.write_bytes(addr, &value.to_le_bytes());
    }

    /// Write an IEEE-754 single.
    pub fn write_f32(&self, addr: u32, value: f32) {
        self.write_u32(addr, value.to_bits());
    }

    fn write_bytes(&self, addr: u32, data: &[u8]) {
        let mut bytes = lock(&self.bytes);
        for (addr, &b) in byte_addrs(addr).zip(data) {
            bytes.insert(addr, b);
        }
    }
}

/// Consecutive byte addresses from `addr`, wrapping at the top of the
/// address space.
fn byte_addrs(addr: u32) -> impl Iterator<Item = u32> {
    (0u32..).map(move |i| addr.wrapping_add(i))
}

impl RegisterBus for SimulatedBus {
    fn read_u8(&self, addr: u32) -> u8 {
        lock(&self.bytes).get(&addr).copied().unwrap_or(0)
    }

    fn read_u32(&self, addr: u32) -> u32 {
        let bytes = lock(&self.bytes);
        let mut word = [0u8; 4];
        for (slot, addr) in word.iter_mut().zip(byte_addrs(addr)) {
            *slot = bytes.get(&addr).copied().unwrap_or(0);
        }
        u32::from_le_bytes(word)
    }
}

/// Manually advanced tick counter.
#[derive(Debug, Default)]
pub struct SimulatedClock {
    now: AtomicU64,
}

impl SimulatedClock {
    /// A clock reading `start`.
    #[must_use]
    pub const fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Advance by `ticks`, wrapping at 2^64.
    pub fn advance(&self, ticks: u64) {
        // fetch_add wraps on overflow.
        self.now.fetch_add(ticks, Ordering::AcqRel);
    }

    /// Jump to an absolute tick value.
    pub fn set(&self, ticks: u64) {
        self.now.store(ticks, Ordering::Release);
    }
}

impl TickSource for SimulatedClock {
    fn ticks(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

/// A console answering supervisor and PTM calls from configured values.
#[derive(Debug)]
pub struct SimulatedConsole {
    clock: SimulatedClock,
    model: ConsoleModel,
    used: RegionBytes,
    failure: Mutex<Option<ResultCode>>,
    cpu_flags: AtomicU8,
}

impl SimulatedConsole {
    /// A console whose clock starts at `config.start_tick`.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            clock: SimulatedClock::new(config.start_tick),
            model: ConsoleModel::Old,
            used: config.region_used,
            failure: Mutex::new(None),
            cpu_flags: AtomicU8::new(0),
        }
    }

    /// Set the hardware model.
    #[must_use]
    pub fn with_model(mut self, model: ConsoleModel) -> Self {
        self.model = model;
        self
    }

    /// The console's tick counter.
    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    /// Hardware model.
    pub fn model(&self) -> ConsoleModel {
        self.model
    }

    /// Make every following `system_info` call fail with `code`.
    pub fn fail_system_info(&self, code: ResultCode) {
        *lock(&self.failure) = Some(code);
    }

    /// Undo [`fail_system_info`](Self::fail_system_info).
    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    /// Last CPU flags applied through [`CpuSpeedup`].
    pub fn cpu_flags(&self) -> u8 {
        self.cpu_flags.load(Ordering::Acquire)
    }

    fn used_bytes(&self, region: MemRegion) -> u32 {
        match region {
            MemRegion::All => self
                .used
                .application
                .wrapping_add(self.used.system)
                .wrapping_add(self.used.base),
            MemRegion::Application => self.used.application,
            MemRegion::System => self.used.system,
            MemRegion::Base => self.used.base,
        }
    }
}

impl TickSource for SimulatedConsole {
    fn ticks(&self) -> u64 {
        self.clock.ticks()
    }
}

impl Supervisor for SimulatedConsole {
    fn system_info(&self, kind: u32, param: i32) -> Result<i64, ResultCode> {
        if let Some(code) = *lock(&self.failure) {
            return Err(code);
        }
        let invalid = ResultCode::new(
            Level::Permanent,
            Summary::InvalidArg,
            MODULE_KERNEL,
            description::INVALID_ENUM_VALUE,
        );
        match kind {
            system_info::MEMORY_USED => {
                let region = u32::try_from(param)
                    .ok()
                    .and_then(MemRegion::from_raw)
                    .ok_or(invalid)?;
                Ok(i64::from(self.used_bytes(region)))
            }
            _ => Err(invalid),
        }
    }
}

impl CpuSpeedup for SimulatedConsole {
    fn configure_new3ds_cpu(&self, flags: u8) -> Result<(), ResultCode> {
        if !self.model.supports_speedup() {
            return Err(ResultCode::new(
                Level::Permanent,
                Summary::NotSupported,
                MODULE_PTM,
                description::NOT_IMPLEMENTED,
            ));
        }
        debug!(flags, "Simulated CPU reconfigured");
        self.cpu_flags.store(flags, Ordering::Release);
        Ok(())
    }
}

/// In-memory version records with failure injection.
#[derive(Debug, Clone, Default)]
pub struct MemoryVersionStorage {
    nver: Vec<u8>,
    cver: Vec<u8>,
    failure: Option<VersionError>,
    reads: Vec<VersionRecord>,
}

impl MemoryVersionStorage {
    /// Storage holding well-formed records.
    #[must_use]
    pub fn new(nver: VersionBin, cver: VersionBin) -> Self {
        Self {
            nver: nver.to_bytes().to_vec(),
            cver: cver.to_bytes().to_vec(),
            failure: None,
            reads: Vec::new(),
        }
    }

    /// Replace a record with arbitrary bytes.
    pub fn set_raw(&mut self, record: VersionRecord, bytes: Vec<u8>) {
        match record {
            VersionRecord::NVer => self.nver = bytes,
            VersionRecord::CVer => self.cver = bytes,
        }
    }

    /// Fail reads of `error.record()` with `error`.
    pub fn fail(&mut self, error: VersionError) {
        self.failure = Some(error);
    }

    /// Records read so far, in order.
    pub fn reads(&self) -> &[VersionRecord] {
        &self.reads
    }
}

impl VersionStorage for MemoryVersionStorage {
    fn read_version_bin(&mut self, record: VersionRecord) -> Result<Vec<u8>, VersionError> {
        self.reads.push(record);
        if let Some(err) = self.failure.as_ref().filter(|e| e.record() == record) {
            return Err(err.clone());
        }
        Ok(match record {
            VersionRecord::NVer => self.nver.clone(),
            VersionRecord::CVer => self.cver.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::SystemRegisters;

    #[test]
    fn test_bus_from_config() {
        let config = SimulationConfig::default();
        let regs = SystemRegisters::new(SimulatedBus::from_config(&config));
        assert_eq!(regs.kernel(), config.kernel_version);
        assert_eq!(regs.core_version(), config.core_version);
        assert_eq!(regs.wifi_strength(), config.wifi_strength);
        assert_eq!(
            regs.mem_region_size(MemRegion::System),
            config.region_sizes.system
        );
        assert_eq!(regs.datetime().date_time, config.datetime_ms);
        assert_eq!(regs.datetime().update_tick, config.start_tick);
    }

    #[test]
    fn test_publish_datetime_alternates_records() {
        let bus = SimulatedBus::new();
        bus.publish_datetime(100, 1);
        assert_eq!(bus.read_u32(DATETIME_SELECTOR_ADDR), 1);
        assert_eq!(bus.read_u64(DATETIME_1_ADDR), 100);

        bus.publish_datetime(200, 2);
        assert_eq!(bus.read_u32(DATETIME_SELECTOR_ADDR), 2);
        assert_eq!(bus.read_u64(DATETIME_0_ADDR), 200);
        // The previous record is left intact.
        assert_eq!(bus.read_u64(DATETIME_1_ADDR), 100);
    }

    #[test]
    fn test_unwritten_bytes_are_zero() {
        let bus = SimulatedBus::new();
        bus.write_u8(0x10, 0xAA);
        assert_eq!(bus.read_u32(0x10), 0xAA);
        assert_eq!(bus.read_u32(0x2000), 0);
    }

    #[test]
    fn test_top_of_address_space() {
        let bus = SimulatedBus::new();
        assert_eq!(bus.read_u32(0xFFFF_FFFC), 0);
        assert_eq!(bus.read_u64(0xFFFF_FFFC), 0);

        bus.write_u32(0xFFFF_FFFC, 0x1234_5678);
        assert_eq!(bus.read_u32(0xFFFF_FFFC), 0x1234_5678);
        assert_eq!(bus.read_u8(0xFFFF_FFFF), 0x12);

        bus.write_u64(0xFFFF_FFFC, 0xAABB_CCDD_0011_2233);
        assert_eq!(bus.read_u32(0xFFFF_FFFC), 0x0011_2233);
        assert_eq!(bus.read_u32(0), 0xAABB_CCDD);
        assert_eq!(bus.read_u64(0xFFFF_FFFC), 0xAABB_CCDD_0011_2233);
    }

    #[test]
    fn test_clock_wraps() {
        let clock = SimulatedClock::new(u64::MAX);
        clock.advance(2);
        assert_eq!(clock.ticks(), 1);
        clock.set(50);
        assert_eq!(clock.ticks(), 50);
    }

    #[test]
    fn test_console_rejects_unknown_queries() {
        let console = SimulatedConsole::from_config(&SimulationConfig::default());
        assert!(console.system_info(system_info::MEMORY_USED, 9).is_err());
        assert!(console.system_info(system_info::MEMORY_USED, -1).is_err());
        assert!(console.system_info(system_info::PROCESS_COUNT, 0).is_err());

        console.fail_system_info(ResultCode(-5));
        assert_eq!(console.system_info(system_info::MEMORY_USED, 1), Err(ResultCode(-5)));
        console.clear_failure();
        assert!(console.system_info(system_info::MEMORY_USED, 1).is_ok());
    }
}
