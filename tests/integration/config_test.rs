//! Loading platform configuration and building a console from it.

use super::common::Console;
use ctr_common::config::{ConfigError, ConsoleModel, PlatformConfig};
use ctr_common::error::OsError;
use ctr_common::version::SystemVersion;
use ctr_os::memory::{region_size, region_used, MemRegion};
use std::io::Write;
use std::time::Duration;

const PROBE_TOML: &str = r#"
model = "new"
speedup = true

[probe]
sample_interval = "250ms"
samples = 4

[simulation]
kernel_version = "2.46.0"
wifi_strength = 1
slider_3d = 0.5

[simulation.region_used]
application = 0x100000
system = 0x200000
base = 0x300000
"#;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROBE_TOML.as_bytes()).unwrap();

    let config = PlatformConfig::from_file(file.path()).unwrap();
    assert_eq!(config.model, ConsoleModel::New);
    assert!(config.speedup);
    assert_eq!(config.probe.sample_interval, Duration::from_millis(250));
    assert_eq!(config.probe.samples, 4);
    assert_eq!(config.simulation.kernel_version, SystemVersion::new(2, 46, 0));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PlatformConfig::from_file(&dir.path().join("probe.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_rejects_impossible_values() {
    let err = PlatformConfig::from_toml("[simulation]\nwifi_strength = 4\n").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid(OsError::OutOfRange { what: "wifi_strength", value: 4 })
    ));

    let err = PlatformConfig::from_toml(
        "[simulation.region_used]\napplication = 0x7FFFFFFF\n",
    )
    .unwrap_err();
    assert!(err.to_string().contains("region_used.application"), "{err}");
}

#[test]
fn test_console_reflects_config() {
    let config = PlatformConfig::from_toml(PROBE_TOML).unwrap();
    let console = Console::from_config(&config);

    assert_eq!(console.regs.kernel(), SystemVersion::new(2, 46, 0));
    assert_eq!(console.regs.wifi_strength(), 1);
    assert_eq!(console.svc.model(), ConsoleModel::New);
    assert_eq!(region_used(&console.svc, MemRegion::Base), 0x300000);
    assert_eq!(region_used(&console.svc, MemRegion::All), 0x600000);
    assert_eq!(
        region_size(&console.regs, MemRegion::Application),
        config.simulation.region_sizes.application
    );
}

#[test]
fn test_toml_round_trip_keeps_values() {
    let config = PlatformConfig::from_toml(PROBE_TOML).unwrap();
    let again = PlatformConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(again.model, config.model);
    assert_eq!(again.probe.sample_interval, config.probe.sample_interval);
    assert_eq!(again.simulation.region_used, config.simulation.region_used);
}
