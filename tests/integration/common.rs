//! Common fixtures for integration tests.

#![allow(dead_code)] // Not every fixture is used by every test module

use ctr_common::config::{ConsoleModel, PlatformConfig, SimulationConfig};
use ctr_os::registers::SystemRegisters;
use ctr_os::sim::{SimulatedBus, SimulatedConsole};
use ctr_os::sysver::VersionBin;

/// A simulated console: its register pages and its supervisor.
pub struct Console {
    /// Register pages.
    pub regs: SystemRegisters<SimulatedBus>,
    /// Supervisor, PTM and tick counter.
    pub svc: SimulatedConsole,
}

impl Console {
    /// Console described by the default simulation config.
    pub fn default_old() -> Self {
        Self::from_config(&PlatformConfig::default())
    }

    /// Console described by `config`.
    pub fn from_config(config: &PlatformConfig) -> Self {
        Self {
            regs: SystemRegisters::new(SimulatedBus::from_config(&config.simulation)),
            svc: SimulatedConsole::from_config(&config.simulation).with_model(config.model),
        }
    }

    /// A New 3DS with the given simulation values.
    pub fn new_model(simulation: SimulationConfig) -> Self {
        Self::from_config(&PlatformConfig {
            model: ConsoleModel::New,
            simulation,
            ..PlatformConfig::default()
        })
    }
}

/// CVer 11.17.0 for the European region.
pub fn cver_11_17() -> VersionBin {
    VersionBin {
        build: 0,
        minor: 17,
        mainver: 11,
        region: b'E',
        ..VersionBin::default()
    }
}

/// NVer 50 for the European region.
pub fn nver_50() -> VersionBin {
    VersionBin {
        mainver: 50,
        region: b'E',
        ..VersionBin::default()
    }
}
