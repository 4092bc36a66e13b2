//! Configuration structures for host tooling and the simulated console.
//!
//! Supports TOML deserialization with defaults matching an original model
//! console on a recent system version.

use crate::error::{OsError, OsResult};
use crate::version::SystemVersion;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Top-level platform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Console model being targeted or simulated.
    pub model: ConsoleModel,

    /// Request the New 3DS CPU speedup at startup.
    pub speedup: bool,

    /// Tick sampling configuration for the probe.
    pub probe: ProbeConfig,

    /// Register and service values of the simulated console.
    pub simulation: SimulationConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            model: ConsoleModel::Old,
            speedup: false,
            probe: ProbeConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// Console hardware model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleModel {
    /// Original 3DS / 2DS.
    #[default]
    Old,
    /// New 3DS / New 2DS.
    New,
}

impl ConsoleModel {
    /// Whether the model supports the 804 MHz mode and L2 cache.
    #[must_use]
    pub const fn supports_speedup(self) -> bool {
        matches!(self, Self::New)
    }
}

/// Tick sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Simulated time between tick counter samples.
    #[serde(with = "humantime_serde")]
    pub sample_interval: Duration,

    /// Number of samples taken by the `ticks` command.
    pub samples: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(16),
            samples: 4,
        }
    }
}

/// Byte counts for the three physical memory regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegionBytes {
    /// Application region.
    pub application: u32,
    /// System region.
    pub system: u32,
    /// Base region.
    pub base: u32,
}

/// Register and service values of the simulated console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Kernel version reported in the config memory.
    pub kernel_version: SystemVersion,

    /// FIRM version reported in the config memory.
    pub firm_version: SystemVersion,

    /// Core version (2 on NATIVE_FIRM, 3 on SAFE_FIRM).
    pub core_version: u32,

    /// Memory layout id (0-5 on Old 3DS, 6-8 on New 3DS).
    pub app_mem_type: u32,

    /// Region sizes reported in the config memory.
    pub region_sizes: RegionBytes,

    /// Bytes in use per region, reported by `svcGetSystemInfo`.
    pub region_used: RegionBytes,

    /// Wi-Fi bars (0-3).
    pub wifi_strength: u8,

    /// 3D slider position (0.0-1.0).
    pub slider_3d: f32,

    /// Milliseconds since 1900-01-01 at `start_tick`.
    pub datetime_ms: u64,

    /// Tick counter value when the simulation starts.
    pub start_tick: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            kernel_version: SystemVersion::new(2, 57, 0),
            firm_version: SystemVersion::new(2, 57, 0),
            core_version: 2,
            app_mem_type: 0,
            region_sizes: RegionBytes {
                application: 0x0400_0000, // 64 MiB
                system: 0x02C0_0000,      // 44 MiB
                base: 0x0140_0000,        // 20 MiB
            },
            region_used: RegionBytes {
                application: 0x0080_0000,
                system: 0x0160_0000,
                base: 0x00E0_0000,
            },
            wifi_strength: 3,
            slider_3d: 0.0,
            // 2024-01-01T00:00:00Z
            datetime_ms: 3_913_056_000_000,
            start_tick: 0,
        }
    }
}

impl SimulationConfig {
    /// Check the configured values against their documented ranges.
    ///
    /// # Errors
    ///
    /// Returns [`OsError::OutOfRange`] for a value the hardware cannot report.
    pub fn validate(&self) -> OsResult<()> {
        if self.wifi_strength > 3 {
            return Err(OsError::OutOfRange {
                what: "wifi_strength",
                value: u64::from(self.wifi_strength),
            });
        }
        if !(0.0..=1.0).contains(&self.slider_3d) {
            return Err(OsError::Config(format!(
                "slider_3d must be within 0.0..=1.0, got {}",
                self.slider_3d
            )));
        }
        let sizes = self.region_sizes;
        let used = self.region_used;
        for (what, used, size) in [
            ("region_used.application", used.application, sizes.application),
            ("region_used.system", used.system, sizes.system),
            ("region_used.base", used.base, sizes.base),
        ] {
            if used > size {
                return Err(OsError::OutOfRange {
                    what,
                    value: u64::from(used),
                });
            }
        }
        Ok(())
    }
}

impl PlatformConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        debug!(?path, "Reading platform config");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.simulation.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed values failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(#[source] OsError),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
