//! Named accessors for the config memory and shared page.
//!
//! The kernel maps two read-only pages into every process:
//!
//! ```text
//! 0x1FF8_0000  config memory   kernel/FIRM versions, memory region sizes
//! 0x1FF8_1000  shared page     date/time records, Wi-Fi, 3D slider
//! ```

use crate::memory::MemRegion;
use crate::mmio::RegisterBus;
use ctr_common::version::SystemVersion;
use serde::{Deserialize, Serialize};

/// Base of the config memory page.
pub const CONFIG_MEM_BASE: u32 = 0x1FF8_0000;
/// Base of the shared page.
pub const SHARED_PAGE_BASE: u32 = 0x1FF8_1000;
/// Size of each of the two pages.
pub const PAGE_SIZE: u32 = 0x1000;

/// Packed kernel version.
pub const KERNEL_VERSION_ADDR: u32 = 0x1FF8_0000;
/// Core version (2 on NATIVE_FIRM, 3 on SAFE_FIRM).
pub const CORE_VERSION_ADDR: u32 = 0x1FF8_0010;
/// Application memory layout id.
pub const APP_MEMTYPE_ADDR: u32 = 0x1FF8_0030;
/// Size of the application region; system and base follow at +4 and +8.
pub const MEM_REGION_SIZES_ADDR: u32 = 0x1FF8_0040;
/// Packed FIRM version.
pub const FIRM_VERSION_ADDR: u32 = 0x1FF8_0060;

/// Update counter of the date/time records; bit 0 selects the active record.
pub const DATETIME_SELECTOR_ADDR: u32 = 0x1FF8_1000;
/// First date/time record.
pub const DATETIME_0_ADDR: u32 = 0x1FF8_1020;
/// Second date/time record.
pub const DATETIME_1_ADDR: u32 = 0x1FF8_1040;
/// Wi-Fi signal strength byte.
pub const WIFI_STRENGTH_ADDR: u32 = 0x1FF8_1066;
/// 3D slider position.
pub const SLIDER_3D_ADDR: u32 = 0x1FF8_1080;

/// One shared-page date/time record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateTimeRecord {
    /// Milliseconds since 1900-01-01 at `update_tick`.
    pub date_time: u64,
    /// System tick at which `date_time` was written.
    pub update_tick: u64,
}

/// Named reads over a [`RegisterBus`].
#[derive(Debug, Clone, Copy)]
pub struct SystemRegisters<B> {
    bus: B,
}

impl<B: RegisterBus> SystemRegisters<B> {
    /// Wrap a bus.
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// The underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// The system's FIRM version, comparable with
    /// [`system_version`](ctr_common::version::system_version).
    #[must_use]
    pub fn firm_version(&self) -> u32 {
        self.bus.read_u32(FIRM_VERSION_ADDR) & !0xFF
    }

    /// The system's kernel version, comparable with
    /// [`system_version`](ctr_common::version::system_version).
    #[must_use]
    pub fn kernel_version(&self) -> u32 {
        self.bus.read_u32(KERNEL_VERSION_ADDR) & !0xFF
    }

    /// [`firm_version`](Self::firm_version) as a typed version.
    #[must_use]
    pub fn firm(&self) -> SystemVersion {
        SystemVersion::from_raw(self.firm_version())
    }

    /// [`kernel_version`](Self::kernel_version) as a typed version.
    #[must_use]
    pub fn kernel(&self) -> SystemVersion {
        SystemVersion::from_raw(self.kernel_version())
    }

    /// The system's core version.
    #[must_use]
    pub fn core_version(&self) -> u32 {
        self.bus.read_u32(CORE_VERSION_ADDR)
    }

    /// Memory layout id (0-5 on Old 3DS, 6-8 on New 3DS).
    #[must_use]
    pub fn application_mem_type(&self) -> u32 {
        self.bus.read_u32(APP_MEMTYPE_ADDR)
    }

    /// Size of a memory region in bytes. [`MemRegion::All`] sums the others.
    #[must_use]
    pub fn mem_region_size(&self, region: MemRegion) -> u32 {
        match region {
            MemRegion::All => self
                .mem_region_size(MemRegion::Application)
                .wrapping_add(self.mem_region_size(MemRegion::System))
                .wrapping_add(self.mem_region_size(MemRegion::Base)),
            other => {
                let index = other as u32 - 1;
                self.bus.read_u32(MEM_REGION_SIZES_ADDR + index * 4)
            }
        }
    }

    /// Wi-Fi signal strength as the number of bars shown by the Home Menu.
    ///
    /// 0 means terrible or disconnected, 3 means good. The system never
    /// reports values above 3.
    #[must_use]
    pub fn wifi_strength(&self) -> u8 {
        self.bus.read_u8(WIFI_STRENGTH_ADDR)
    }

    /// State of the 3D slider (0.0-1.0).
    #[must_use]
    pub fn slider_3d(&self) -> f32 {
        self.bus.read_f32(SLIDER_3D_ADDR)
    }

    /// Update counter of the date/time records.
    #[must_use]
    pub fn datetime_selector(&self) -> u32 {
        self.bus.read_u32(DATETIME_SELECTOR_ADDR)
    }

    /// The active date/time record.
    ///
    /// The kernel rewrites the inactive record and then bumps the selector,
    /// so the read is repeated until the selector is stable across it.
    #[must_use]
    pub fn datetime(&self) -> DateTimeRecord {
        loop {
            let before = self.datetime_selector();
            let addr = if before & 1 == 0 {
                DATETIME_0_ADDR
            } else {
                DATETIME_1_ADDR
            };
            let record = DateTimeRecord {
                date_time: self.bus.read_u64(addr),
                update_tick: self.bus.read_u64(addr + 8),
            };
            if self.datetime_selector() == before {
                return record;
            }
            std::hint::spin_loop();
        }
    }
}
