//! Register bus abstraction over fixed-address reads.
//!
//! Nothing outside this module dereferences an address. Accessors in
//! [`registers`](crate::registers) name each location and read it through a
//! [`RegisterBus`], which is either a [`VolatileBus`] over mapped memory or a
//! [`SimulatedBus`](crate::sim::SimulatedBus) in tests and host tooling.

use std::marker::PhantomData;
use std::ptr::NonNull;

/// Read-only access to memory-mapped words and bytes.
///
/// Addresses are 32-bit virtual addresses of the console's address space.
/// Reads never fail; an unmapped read on hardware faults the process.
pub trait RegisterBus {
    /// Read one byte.
    fn read_u8(&self, addr: u32) -> u8;

    /// Read one little-endian word. `addr` is word aligned.
    fn read_u32(&self, addr: u32) -> u32;

    /// Read a 64-bit value stored as two little-endian words.
    ///
    /// The high word address wraps at the top of the address space.
    fn read_u64(&self, addr: u32) -> u64 {
        let lo = u64::from(self.read_u32(addr));
        let hi = u64::from(self.read_u32(addr.wrapping_add(4)));
        (hi << 32) | lo
    }

    /// Read an IEEE-754 single stored in one word.
    fn read_f32(&self, addr: u32) -> f32 {
        f32::from_bits(self.read_u32(addr))
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    fn read_u8(&self, addr: u32) -> u8 {
        (**self).read_u8(addr)
    }

    fn read_u32(&self, addr: u32) -> u32 {
        (**self).read_u32(addr)
    }
}

/// Volatile reads over a mapped window of the address space.
///
/// The window starts at virtual address `origin` and is backed by host memory
/// at `base`. On the console the shared pages are identity mapped, so
/// [`VolatileBus::identity`] uses `origin` itself as the pointer.
#[derive(Debug, Clone, Copy)]
pub struct VolatileBus<'a> {
    base: NonNull<u8>,
    origin: u32,
    len: u32,
    _window: PhantomData<&'a [u8]>,
}

impl<'a> VolatileBus<'a> {
    /// Bus over a host byte slice standing in for the window at `origin`.
    ///
    /// Reads outside the slice return zero.
    #[must_use]
    pub fn over_slice(window: &'a [u8], origin: u32) -> Self {
        let len = u32::try_from(window.len()).unwrap_or(u32::MAX);
        Self {
            base: NonNull::from(window).cast(),
            origin,
            len,
            _window: PhantomData,
        }
    }

    /// Bus over the identity-mapped window `[origin, origin + len)`.
    ///
    /// Returns `None` if `origin` is zero.
    ///
    /// # Safety
    ///
    /// The whole window must be mapped readable in the current process for
    /// the lifetime `'a`.
    #[must_use]
    pub unsafe fn identity(origin: u32, len: u32) -> Option<Self> {
        let base = NonNull::new(origin as usize as *mut u8)?;
        Some(Self {
            base,
            origin,
            len,
            _window: PhantomData,
        })
    }

    /// Byte offset into the window, if `[addr, addr + width)` lies inside it.
    #[inline]
    fn offset(&self, addr: u32, width: u32) -> Option<usize> {
        let off = addr.checked_sub(self.origin)?;
        if off.checked_add(width)? <= self.len {
            Some(off as usize)
        } else {
            None
        }
    }
}

impl RegisterBus for VolatileBus<'_> {
    fn read_u8(&self, addr: u32) -> u8 {
        match self.offset(addr, 1) {
            // SAFETY: the offset is inside the window, which the constructor
            // guarantees is readable for 'a.
            Some(off) => unsafe { self.base.as_ptr().add(off).read_volatile() },
            None => 0,
        }
    }

    fn read_u32(&self, addr: u32) -> u32 {
        match self.offset(addr, 4) {
            Some(off) => {
                // SAFETY: as above; unaligned access keeps host slices valid
                // regardless of their alignment.
                let ptr = unsafe { self.base.as_ptr().add(off) }.cast::<u32>();
                if ptr.is_aligned() {
                    u32::from_le(unsafe { ptr.read_volatile() })
                } else {
                    u32::from_le(unsafe { ptr.read_unaligned() })
                }
            }
            None => 0,
        }
    }
}
