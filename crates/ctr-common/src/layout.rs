//! Virtual and physical memory layout of an application process.
//!
//! ```text
//! virtual                         physical
//! 0x0800_0000 ┬ heap area
//! 0x0E00_0000 ┴
//! 0x1000_0000 ┬ map area
//! 0x1400_0000 ┼ old linear FCRAM  ──────▶ 0x2000_0000 (128 MiB, pre-8.x)
//! 0x1E80_0000   QTM RAM           ──────▶ 0x1F00_0000 (New 3DS)
//! 0x1EC0_0000   MMIO              ──────▶ 0x1010_0000
//! 0x1F00_0000   VRAM              ──────▶ 0x1800_0000
//! 0x1FF0_0000   DSP RAM           ──────▶ 0x1FF0_0000
//! 0x3000_0000   linear FCRAM      ──────▶ 0x2000_0000 (256 MiB)
//! ```

/// Start of the heap area in the virtual address space.
pub const OS_HEAP_AREA_BEGIN: u32 = 0x0800_0000;
/// End of the heap area in the virtual address space.
pub const OS_HEAP_AREA_END: u32 = 0x0E00_0000;

/// Start of the mappable area in the virtual address space.
pub const OS_MAP_AREA_BEGIN: u32 = 0x1000_0000;
/// End of the mappable area in the virtual address space.
pub const OS_MAP_AREA_END: u32 = 0x1400_0000;

/// Old pre-8.x linear FCRAM mapping virtual address.
pub const OS_OLD_FCRAM_VADDR: u32 = 0x1400_0000;
/// Old pre-8.x linear FCRAM mapping physical address.
pub const OS_OLD_FCRAM_PADDR: u32 = 0x2000_0000;
/// Old pre-8.x linear FCRAM mapping size (128 MiB).
pub const OS_OLD_FCRAM_SIZE: u32 = 0x0800_0000;

/// New 3DS QTM memory virtual address.
pub const OS_QTMRAM_VADDR: u32 = 0x1E80_0000;
/// New 3DS QTM memory physical address.
pub const OS_QTMRAM_PADDR: u32 = 0x1F00_0000;
/// New 3DS QTM memory size (4 MiB; last 128 KiB reserved by kernel).
pub const OS_QTMRAM_SIZE: u32 = 0x0040_0000;

/// Memory mapped IO range virtual address.
pub const OS_MMIO_VADDR: u32 = 0x1EC0_0000;
/// Memory mapped IO range physical address.
pub const OS_MMIO_PADDR: u32 = 0x1010_0000;
/// Memory mapped IO range size (4 MiB).
pub const OS_MMIO_SIZE: u32 = 0x0040_0000;

/// VRAM virtual address.
pub const OS_VRAM_VADDR: u32 = 0x1F00_0000;
/// VRAM physical address.
pub const OS_VRAM_PADDR: u32 = 0x1800_0000;
/// VRAM size (6 MiB).
pub const OS_VRAM_SIZE: u32 = 0x0060_0000;

/// DSP memory virtual address.
pub const OS_DSPRAM_VADDR: u32 = 0x1FF0_0000;
/// DSP memory physical address.
pub const OS_DSPRAM_PADDR: u32 = 0x1FF0_0000;
/// DSP memory size (512 KiB).
pub const OS_DSPRAM_SIZE: u32 = 0x0008_0000;

/// Linear FCRAM mapping virtual address.
pub const OS_FCRAM_VADDR: u32 = 0x3000_0000;
/// Linear FCRAM mapping physical address.
pub const OS_FCRAM_PADDR: u32 = 0x2000_0000;
/// Linear FCRAM mapping size (256 MiB).
pub const OS_FCRAM_SIZE: u32 = 0x1000_0000;

/// A fixed virtual-to-physical mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedRegion {
    /// Short region name.
    pub name: &'static str,
    /// First virtual address of the mapping.
    pub vaddr: u32,
    /// Physical address backing `vaddr`.
    pub paddr: u32,
    /// Size in bytes.
    pub size: u32,
}

impl MappedRegion {
    /// Whether `vaddr` falls inside this mapping.
    #[inline]
    #[must_use]
    pub const fn contains(&self, vaddr: u32) -> bool {
        vaddr >= self.vaddr && vaddr - self.vaddr < self.size
    }

    /// Physical address for `vaddr`, if it is inside this mapping.
    #[inline]
    #[must_use]
    pub const fn translate(&self, vaddr: u32) -> Option<u32> {
        if self.contains(vaddr) {
            Some(vaddr - self.vaddr + self.paddr)
        } else {
            None
        }
    }

    /// One past the last virtual address.
    #[must_use]
    pub const fn vend(&self) -> u64 {
        self.vaddr as u64 + self.size as u64
    }
}

/// Every fixed mapping with a known physical backing.
pub const MAPPED_REGIONS: [MappedRegion; 6] = [
    MappedRegion {
        name: "old_fcram",
        vaddr: OS_OLD_FCRAM_VADDR,
        paddr: OS_OLD_FCRAM_PADDR,
        size: OS_OLD_FCRAM_SIZE,
    },
    MappedRegion {
        name: "qtmram",
        vaddr: OS_QTMRAM_VADDR,
        paddr: OS_QTMRAM_PADDR,
        size: OS_QTMRAM_SIZE,
    },
    MappedRegion {
        name: "mmio",
        vaddr: OS_MMIO_VADDR,
        paddr: OS_MMIO_PADDR,
        size: OS_MMIO_SIZE,
    },
    MappedRegion {
        name: "vram",
        vaddr: OS_VRAM_VADDR,
        paddr: OS_VRAM_PADDR,
        size: OS_VRAM_SIZE,
    },
    MappedRegion {
        name: "dspram",
        vaddr: OS_DSPRAM_VADDR,
        paddr: OS_DSPRAM_PADDR,
        size: OS_DSPRAM_SIZE,
    },
    MappedRegion {
        name: "fcram",
        vaddr: OS_FCRAM_VADDR,
        paddr: OS_FCRAM_PADDR,
        size: OS_FCRAM_SIZE,
    },
];
