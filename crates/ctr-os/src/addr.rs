//! Virtual address translation for the fixed mappings.

use ctr_common::error::{OsError, OsResult};
use ctr_common::layout::{
    MappedRegion, MAPPED_REGIONS, OS_FCRAM_SIZE, OS_FCRAM_VADDR, OS_OLD_FCRAM_SIZE,
    OS_OLD_FCRAM_VADDR,
};

/// The fixed mapping containing `vaddr`, if any.
#[must_use]
pub fn mapping_of(vaddr: u32) -> Option<&'static MappedRegion> {
    MAPPED_REGIONS.iter().find(|r| r.contains(vaddr))
}

/// Physical address of a process virtual address.
///
/// Only the fixed linear mappings (FCRAM, VRAM, DSP RAM, QTM RAM and MMIO)
/// translate; heap and map-area addresses are backed by scattered pages and
/// yield `None`. Services and the GPU command buffer need physical addresses.
#[must_use]
pub fn virt_to_phys(vaddr: u32) -> Option<u32> {
    mapping_of(vaddr).and_then(|r| r.translate(vaddr))
}

/// [`virt_to_phys`] as an error for callers that propagate with `?`.
///
/// # Errors
///
/// Returns [`OsError::Unmapped`] if `vaddr` is outside every fixed mapping.
pub fn try_virt_to_phys(vaddr: u32) -> OsResult<u32> {
    virt_to_phys(vaddr).ok_or(OsError::Unmapped(vaddr))
}

/// Move an address from the old `0x14*` linear mapping to the `0x30*` one.
///
/// Addresses already in the new mapping are returned unchanged. Anything
/// outside both yields `None`.
#[must_use]
pub fn old_linear_to_new(vaddr: u32) -> Option<u32> {
    if vaddr >= OS_FCRAM_VADDR && vaddr - OS_FCRAM_VADDR < OS_FCRAM_SIZE {
        return Some(vaddr);
    }
    if vaddr >= OS_OLD_FCRAM_VADDR && vaddr - OS_OLD_FCRAM_VADDR < OS_OLD_FCRAM_SIZE {
        return Some(vaddr - OS_OLD_FCRAM_VADDR + OS_FCRAM_VADDR);
    }
    None
}
