//! Tick counter behavior against the simulated clock.

use super::common::Console;
use ctr_common::clock::{duration_to_ticks, SYSCLOCK_ARM11};
use ctr_os::sim::SimulatedClock;
use ctr_os::tick::{TickCounter, TickSource};
use std::time::Duration;

#[test]
fn test_elapsed_is_exact_difference() {
    for (t0, t1) in [(0u64, 0u64), (1, 2), (1_000, 268_112_856), (u64::MAX - 1, u64::MAX)] {
        let clock = SimulatedClock::new(t0);
        let mut counter = TickCounter::new();
        counter.start(&clock);
        clock.set(t1);
        counter.update(&clock);
        assert_eq!(counter.elapsed(), t1 - t0, "t0={t0} t1={t1}");
    }
}

#[test]
fn test_read_repeats_without_update() {
    let clock = SimulatedClock::new(10);
    let mut counter = TickCounter::new();
    counter.start(&clock);
    clock.advance(123_456_789);
    counter.update(&clock);

    let a = counter.read();
    clock.advance(1_000_000);
    let b = counter.read();
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn test_three_samples() {
    let clock = SimulatedClock::new(5);
    let mut counter = TickCounter::new();
    counter.start(&clock);

    clock.set(105);
    counter.update(&clock);
    let first = counter.elapsed();

    clock.set(1_105);
    counter.update(&clock);
    let second = counter.elapsed();

    assert_eq!(first, 100);
    assert_eq!(second, 1_000);
}

#[test]
fn test_wrapping_clock() {
    let clock = SimulatedClock::new(u64::MAX - 99);
    let mut counter = TickCounter::new();
    counter.start(&clock);
    clock.advance(250);
    assert_eq!(clock.ticks(), 150);
    counter.update(&clock);
    assert_eq!(counter.elapsed(), 250);
}

#[test]
fn test_one_second_is_1000_ms() {
    let clock = SimulatedClock::new(0);
    let mut counter = TickCounter::new();
    counter.start(&clock);
    clock.advance(u64::from(SYSCLOCK_ARM11));
    counter.update(&clock);
    assert!((counter.read() - 1000.0).abs() < 1e-9);
}

#[test]
fn test_immediate_update_reads_zero() {
    let clock = SimulatedClock::new(42);
    let mut counter = TickCounter::new();
    counter.start(&clock);
    counter.update(&clock);
    assert_eq!(counter.elapsed(), 0);
    assert_eq!(counter.read(), 0.0);
}

#[test]
fn test_counter_samples_console_supervisor() {
    let console = Console::default_old();
    let mut counter = TickCounter::new();
    counter.start(&console.svc);
    console.svc.clock().advance(duration_to_ticks(Duration::from_millis(16)));
    counter.update(&console.svc);

    assert!((counter.read() - 16.0).abs() < 0.001);
    // Both conversions truncate, so the round trip lands just under 16ms.
    let elapsed = counter.elapsed_duration();
    assert!(elapsed <= Duration::from_millis(16));
    assert!(elapsed > Duration::from_micros(15_990));
}

#[test]
fn test_counters_are_independent() {
    let clock = SimulatedClock::new(0);
    let mut outer = TickCounter::new();
    let mut inner = TickCounter::new();
    outer.start(&clock);
    clock.advance(10);
    inner.start(&clock);
    clock.advance(5);
    inner.update(&clock);
    outer.update(&clock);

    assert_eq!(inner.elapsed(), 5);
    assert_eq!(outer.elapsed(), 15);
}
