//! Register, memory, address and time queries over a simulated console.

use super::common::Console;
use ctr_common::config::{RegionBytes, SimulationConfig};
use ctr_common::layout::{OS_FCRAM_VADDR, OS_OLD_FCRAM_VADDR};
use ctr_common::result::ResultCode;
use ctr_common::version::{system_version, version_major, version_minor, SystemVersion};
use ctr_os::addr::{old_linear_to_new, virt_to_phys};
use ctr_os::memory::{region_free, region_size, region_used, MemRegion};
use ctr_os::speedup::set_speedup_enable;
use ctr_os::strerror::str_error;
use ctr_os::time::{current_time_ms, unix_time_ms};

#[test]
fn test_version_registers_compare_with_packed_versions() {
    let console = Console::default_old();
    let kernel = console.regs.kernel_version();
    assert!(kernel > system_version(2, 46, 0), "running 9.0 or higher");
    assert_eq!(version_major(kernel), 2);
    assert_eq!(version_minor(kernel), 57);
    assert_eq!(console.regs.firm(), SystemVersion::new(2, 57, 0));
}

#[test]
fn test_new_model_layout() {
    let console = Console::new_model(SimulationConfig {
        app_mem_type: 7,
        region_sizes: RegionBytes {
            application: 0x0780_0000,
            system: 0x0640_0000,
            base: 0x0200_0000,
        },
        wifi_strength: 0,
        slider_3d: 1.0,
        ..SimulationConfig::default()
    });

    assert_eq!(console.regs.application_mem_type(), 7);
    assert_eq!(console.regs.wifi_strength(), 0);
    assert!((console.regs.slider_3d() - 1.0).abs() < f32::EPSILON);
    assert_eq!(region_size(&console.regs, MemRegion::All), 0x0FC0_0000);
}

#[test]
fn test_memory_accounting_is_consistent() {
    let console = Console::default_old();
    for region in [
        MemRegion::All,
        MemRegion::Application,
        MemRegion::System,
        MemRegion::Base,
    ] {
        let size = region_size(&console.regs, region);
        let used = region_used(&console.svc, region);
        let free = region_free(&console.regs, &console.svc, region);
        assert_eq!(size, used + free, "{region}");
    }
}

#[test]
fn test_usage_failure_is_not_observable() {
    let console = Console::default_old();
    console.svc.fail_system_info(ResultCode::from_raw(0xE0E0_1BF5));
    assert_eq!(region_used(&console.svc, MemRegion::Application), 0);
}

#[test]
fn test_time_tracks_clock() {
    let console = Console::default_old();
    let start = current_time_ms(&console.regs, &console.svc);
    assert_eq!(unix_time_ms(&console.regs, &console.svc), 1_704_067_200_000);

    // 60.1 seconds at the ARM11 tick rate.
    console.svc.clock().advance(268_111_856 * 60 + 26_811_186);
    let later = current_time_ms(&console.regs, &console.svc);
    assert_eq!(later - start, 60_100);
}

#[test]
fn test_speedup_only_on_new_model() {
    let old = Console::default_old();
    set_speedup_enable(&old.svc, true);
    assert_eq!(old.svc.cpu_flags(), 0);

    let new = Console::new_model(SimulationConfig::default());
    set_speedup_enable(&new.svc, true);
    assert_eq!(new.svc.cpu_flags(), 3);
}

#[test]
fn test_address_helpers_agree() {
    let old = OS_OLD_FCRAM_VADDR + 0x4000;
    let new = old_linear_to_new(old).unwrap();
    assert_eq!(new, OS_FCRAM_VADDR + 0x4000);
    assert_eq!(virt_to_phys(old), virt_to_phys(new));
    assert_eq!(old_linear_to_new(new), Some(new));
}

#[test]
fn test_str_error_is_static() {
    let msg: &'static str = str_error(ResultCode::from_raw(0xC880_4464));
    assert!(!msg.is_empty());
}
