//! System version data from the NVer and CVer records.
//!
//! Each record is an 8-byte `version.bin` inside a system data archive on
//! NAND. Opening and reading the archive is delegated to a [`VersionStorage`].
//! CVer carries the `major.minor.build` shown by System Settings and NVer
//! carries the NUP version and region letter.

use ctr_common::result::ResultCode;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Raw result code of a version record shorter than [`VersionBin::SIZE`].
pub const SHORT_READ_CODE: i32 = -9;

/// Contents of one `version.bin`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionBin {
    /// Build number.
    pub build: u8,
    /// Minor version.
    pub minor: u8,
    /// Major version in CVer; NUP version in NVer.
    pub mainver: u8,
    /// Reserved.
    pub reserved_x3: u8,
    /// ASCII region letter.
    pub region: u8,
    /// Reserved.
    pub reserved_x5: [u8; 3],
}

const_assert_eq!(std::mem::size_of::<VersionBin>(), VersionBin::SIZE);

impl VersionBin {
    /// Size of the record on storage.
    pub const SIZE: usize = 8;

    /// Decode a record from the start of `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let b: &[u8; Self::SIZE] = bytes.get(..Self::SIZE)?.try_into().ok()?;
        Some(Self {
            build: b[0],
            minor: b[1],
            mainver: b[2],
            reserved_x3: b[3],
            region: b[4],
            reserved_x5: [b[5], b[6], b[7]],
        })
    }

    /// Encode the record as stored.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let [r5, r6, r7] = self.reserved_x5;
        [
            self.build,
            self.minor,
            self.mainver,
            self.reserved_x3,
            self.region,
            r5,
            r6,
            r7,
        ]
    }

    /// Region letter as a character.
    #[must_use]
    pub fn region_char(&self) -> char {
        char::from(self.region)
    }
}

/// Console region as configured in the system settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SystemRegion {
    /// Japan.
    Japan = 0,
    /// North America.
    Usa = 1,
    /// Europe.
    Europe = 2,
    /// Australia; shares the European archives.
    Australia = 3,
    /// China.
    China = 4,
    /// Korea.
    Korea = 5,
    /// Taiwan.
    Taiwan = 6,
}

/// One of the two version records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionRecord {
    /// NUP version record.
    NVer,
    /// Console version record.
    CVer,
}

impl VersionRecord {
    /// Title id of the system data archive holding this record.
    #[must_use]
    pub const fn title_id(self, region: SystemRegion) -> u64 {
        match self {
            Self::CVer => 0x0004_00DB_0001_7302,
            Self::NVer => match region {
                SystemRegion::Japan => 0x0004_00DB_0001_6202,
                SystemRegion::Usa => 0x0004_00DB_0001_6302,
                SystemRegion::Europe | SystemRegion::Australia => 0x0004_00DB_0001_6102,
                SystemRegion::China => 0x0004_00DB_0001_6402,
                SystemRegion::Korea => 0x0004_00DB_0001_6502,
                SystemRegion::Taiwan => 0x0004_00DB_0001_6602,
            },
        }
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NVer => write!(f, "NVer"),
            Self::CVer => write!(f, "CVer"),
        }
    }
}

/// Failure reading a version record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Opening or reading `version.bin` failed with an I/O error number.
    #[error("reading {record} version.bin failed with errno {errno}")]
    Io {
        /// Record being read.
        record: VersionRecord,
        /// Positive error number.
        errno: i32,
    },

    /// The platform rejected access to the record's archive.
    #[error("opening {record} archive failed with result {code}")]
    Platform {
        /// Record being read.
        record: VersionRecord,
        /// Negative platform result code.
        code: ResultCode,
    },

    /// The record was shorter than a `version.bin`.
    #[error("{record} version.bin is {len} bytes, expected {}", VersionBin::SIZE)]
    ShortRead {
        /// Record being read.
        record: VersionRecord,
        /// Bytes actually read.
        len: usize,
    },
}

impl VersionError {
    /// The signed result code: positive for I/O error numbers, negative for
    /// platform failures.
    #[must_use]
    pub const fn raw(&self) -> i32 {
        match self {
            Self::Io { errno, .. } => *errno,
            Self::Platform { code, .. } => code.0,
            Self::ShortRead { .. } => SHORT_READ_CODE,
        }
    }

    /// Record whose read failed.
    #[must_use]
    pub const fn record(&self) -> VersionRecord {
        match self {
            Self::Io { record, .. }
            | Self::Platform { record, .. }
            | Self::ShortRead { record, .. } => *record,
        }
    }
}

/// Access to the on-device version records.
pub trait VersionStorage {
    /// Read the raw contents of `record`'s `version.bin`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Io`] or [`VersionError::Platform`] when the
    /// archive or file cannot be read.
    fn read_version_bin(&mut self, record: VersionRecord) -> Result<Vec<u8>, VersionError>;
}

/// Both version records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemVersionData {
    /// NUP version record.
    pub nver: VersionBin,
    /// Console version record.
    pub cver: VersionBin,
}

fn read_record<S: VersionStorage + ?Sized>(
    storage: &mut S,
    record: VersionRecord,
) -> Result<VersionBin, VersionError> {
    let bytes = storage.read_version_bin(record)?;
    VersionBin::from_bytes(&bytes).ok_or(VersionError::ShortRead {
        record,
        len: bytes.len(),
    })
}

/// Read NVer then CVer.
///
/// # Errors
///
/// Returns the first failing record's error; nothing is retried.
pub fn system_version_data<S: VersionStorage + ?Sized>(
    storage: &mut S,
) -> Result<SystemVersionData, VersionError> {
    let nver = read_record(storage, VersionRecord::NVer)?;
    let cver = read_record(storage, VersionRecord::CVer)?;
    debug!(
        cver = %format_args!("{}.{}.{}", cver.mainver, cver.minor, cver.build),
        nver = nver.mainver,
        region = %nver.region_char(),
        "Read system version data"
    );
    Ok(SystemVersionData { nver, cver })
}

/// The signed result code of a version read: zero on success.
#[must_use]
pub fn version_result_code<T>(result: &Result<T, VersionError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.raw(),
    }
}
