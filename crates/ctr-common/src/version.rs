//! Packed system versions.
//!
//! Kernel and FIRM versions are reported as a single word with the major
//! version in the top byte, followed by minor and revision. The low byte is
//! always clear, so packed values compare the same way as the versions they
//! encode.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Pack a system version from its components.
#[inline]
#[must_use]
pub const fn system_version(major: u8, minor: u8, revision: u8) -> u32 {
    ((major as u32) << 24) | ((minor as u32) << 16) | ((revision as u32) << 8)
}

/// Major version of a packed system version.
#[inline]
#[must_use]
pub const fn version_major(version: u32) -> u32 {
    version >> 24
}

/// Minor version of a packed system version.
#[inline]
#[must_use]
pub const fn version_minor(version: u32) -> u32 {
    (version >> 16) & 0xFF
}

/// Revision of a packed system version.
#[inline]
#[must_use]
pub const fn version_revision(version: u32) -> u32 {
    (version >> 8) & 0xFF
}

/// A packed system version with typed accessors.
///
/// ```
/// use ctr_common::version::SystemVersion;
///
/// let kernel = SystemVersion::from_raw(0x022E_0000);
/// assert!(kernel >= SystemVersion::new(2, 46, 0));
/// assert_eq!(kernel.to_string(), "2.46.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SystemVersion(u32);

impl SystemVersion {
    /// Build a version from its components.
    #[must_use]
    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        Self(system_version(major, minor, revision))
    }

    /// Wrap a packed value as read from the config memory.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The packed value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Major version.
    #[must_use]
    pub const fn major(self) -> u32 {
        version_major(self.0)
    }

    /// Minor version.
    #[must_use]
    pub const fn minor(self) -> u32 {
        version_minor(self.0)
    }

    /// Revision.
    #[must_use]
    pub const fn revision(self) -> u32 {
        version_revision(self.0)
    }
}

impl fmt::Display for SystemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.revision())
    }
}

/// Error parsing a `major.minor.revision` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid system version {input:?}: expected major.minor.revision with components 0-255")]
pub struct ParseVersionError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for SystemVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError {
            input: s.to_string(),
        };
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u8, ParseVersionError> {
            parts.next().ok_or_else(err)?.parse().map_err(|_| err())
        };
        let major = next()?;
        let minor = next()?;
        let revision = next()?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::new(major, minor, revision))
    }
}

impl Serialize for SystemVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SystemVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
