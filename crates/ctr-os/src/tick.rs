//! Tick counter for measuring elapsed time.
//!
//! The system tick counter is free-running from power-on at
//! [`SYSCLOCK_ARM11`](ctr_common::clock::SYSCLOCK_ARM11) Hz. A
//! [`TickCounter`] samples it through a [`TickSource`] so tests can substitute
//! a deterministic clock for the supervisor call.
//!
//! # Example
//!
//! ```
//! use ctr_os::tick::TickCounter;
//! use std::cell::Cell;
//!
//! let now = Cell::new(1_000u64);
//! let source = || now.get();
//!
//! let mut counter = TickCounter::new();
//! counter.start(&source);
//! now.set(1_000 + 268_111_856);
//! counter.update(&source);
//!
//! assert_eq!(counter.elapsed(), 268_111_856);
//! assert!((counter.read() - 1000.0).abs() < 1e-9);
//! ```

use ctr_common::clock::{ticks_to_duration, ticks_to_ms};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A source of absolute system ticks.
///
/// Values are monotonically non-decreasing modulo 2^64.
pub trait TickSource {
    /// Current absolute tick count.
    fn ticks(&self) -> u64;
}

impl<F> TickSource for F
where
    F: Fn() -> u64,
{
    #[inline]
    fn ticks(&self) -> u64 {
        self()
    }
}

/// Elapsed ticks between consecutive samples of a [`TickSource`].
///
/// The counter owns no resources; it is two words the caller keeps on the
/// stack or inside its own state. It is not synchronized: use one counter per
/// measuring context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickCounter {
    /// Ticks between the last two samples.
    elapsed: u64,
    /// Tick value of the last sample.
    reference: u64,
}

impl TickCounter {
    /// Create a counter with zeroed fields.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: 0,
            reference: 0,
        }
    }

    /// Take the reference sample.
    #[inline]
    pub fn start<S: TickSource + ?Sized>(&mut self, source: &S) {
        self.reference = source.ticks();
    }

    /// Measure the ticks since the last sample and make now the new reference.
    ///
    /// Without a prior [`start`](Self::start) the interval is measured from
    /// whatever `reference` holds, which is zero for a fresh counter. That is
    /// the caller's responsibility and is not checked.
    #[inline]
    pub fn update<S: TickSource + ?Sized>(&mut self, source: &S) {
        let now = source.ticks();
        self.elapsed = now.wrapping_sub(self.reference);
        self.reference = now;
    }

    /// Elapsed time of the last interval in milliseconds.
    #[inline]
    #[must_use]
    pub fn read(&self) -> f64 {
        ticks_to_ms(self.elapsed)
    }

    /// Elapsed ticks of the last interval.
    #[inline]
    #[must_use]
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Tick value of the last sample.
    #[inline]
    #[must_use]
    pub const fn reference(&self) -> u64 {
        self.reference
    }

    /// Elapsed time of the last interval as a [`Duration`].
    #[must_use]
    pub fn elapsed_duration(&self) -> Duration {
        ticks_to_duration(self.elapsed)
    }
}
