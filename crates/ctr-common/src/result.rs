//! Service result codes.
//!
//! A result code is a signed 32-bit word. Non-negative values are
//! successes; failures carry their classification in bit fields:
//!
//! ```text
//!  31    27 26    21 20  18 17      10 9          0
//! ┌────────┬────────┬──────┬──────────┬────────────┐
//! │ level  │summary │  --  │  module  │description │
//! └────────┴────────┴──────┴──────────┴────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Success.
    Success,
    /// Informational.
    Info,
    /// Status change.
    Status,
    /// Temporary failure; retrying may succeed.
    Temporary,
    /// Permanent failure.
    Permanent,
    /// Usage error by the caller.
    Usage,
    /// The service must be reinitialized.
    Reinitialize,
    /// The system must be reset.
    Reset,
    /// Fatal error.
    Fatal,
    /// A level value without a name.
    Other(u8),
}

impl Level {
    /// Decode the 5-bit level field.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x1F {
            0 => Self::Success,
            1 => Self::Info,
            0x19 => Self::Status,
            0x1A => Self::Temporary,
            0x1B => Self::Permanent,
            0x1C => Self::Usage,
            0x1D => Self::Reinitialize,
            0x1E => Self::Reset,
            0x1F => Self::Fatal,
            other => Self::Other(other),
        }
    }

    /// Encode into the 5-bit level field.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Info => 1,
            Self::Status => 0x19,
            Self::Temporary => 0x1A,
            Self::Permanent => 0x1B,
            Self::Usage => 0x1C,
            Self::Reinitialize => 0x1D,
            Self::Reset => 0x1E,
            Self::Fatal => 0x1F,
            Self::Other(bits) => bits & 0x1F,
        }
    }
}

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Summary {
    /// Success.
    Success,
    /// Nothing happened.
    Nop,
    /// The operation would block.
    WouldBlock,
    /// Not enough resources.
    OutOfResource,
    /// Not found.
    NotFound,
    /// Invalid state.
    InvalidState,
    /// Unsupported operation.
    NotSupported,
    /// Invalid argument.
    InvalidArg,
    /// Wrong argument.
    WrongArg,
    /// Canceled.
    Canceled,
    /// Status changed.
    StatusChanged,
    /// Internal error.
    Internal,
    /// Invalid result value.
    InvalidResultValue,
    /// A summary value without a name.
    Other(u8),
}

impl Summary {
    /// Decode the 6-bit summary field.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3F {
            0 => Self::Success,
            1 => Self::Nop,
            2 => Self::WouldBlock,
            3 => Self::OutOfResource,
            4 => Self::NotFound,
            5 => Self::InvalidState,
            6 => Self::NotSupported,
            7 => Self::InvalidArg,
            8 => Self::WrongArg,
            9 => Self::Canceled,
            10 => Self::StatusChanged,
            11 => Self::Internal,
            63 => Self::InvalidResultValue,
            other => Self::Other(other),
        }
    }

    /// Encode into the 6-bit summary field.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Nop => 1,
            Self::WouldBlock => 2,
            Self::OutOfResource => 3,
            Self::NotFound => 4,
            Self::InvalidState => 5,
            Self::NotSupported => 6,
            Self::InvalidArg => 7,
            Self::WrongArg => 8,
            Self::Canceled => 9,
            Self::StatusChanged => 10,
            Self::Internal => 11,
            Self::InvalidResultValue => 63,
            Self::Other(bits) => bits & 0x3F,
        }
    }
}

/// Common description values shared by all modules.
pub mod description {
    /// Success.
    pub const SUCCESS: u16 = 0;
    /// Invalid selection.
    pub const INVALID_SELECTION: u16 = 1000;
    /// Too large.
    pub const TOO_LARGE: u16 = 1001;
    /// Not authorized.
    pub const NOT_AUTHORIZED: u16 = 1002;
    /// Already done.
    pub const ALREADY_DONE: u16 = 1003;
    /// Invalid size.
    pub const INVALID_SIZE: u16 = 1004;
    /// Invalid enum value.
    pub const INVALID_ENUM_VALUE: u16 = 1005;
    /// Invalid combination.
    pub const INVALID_COMBINATION: u16 = 1006;
    /// No data.
    pub const NO_DATA: u16 = 1007;
    /// Busy.
    pub const BUSY: u16 = 1008;
    /// Misaligned address.
    pub const MISALIGNED_ADDRESS: u16 = 1009;
    /// Misaligned size.
    pub const MISALIGNED_SIZE: u16 = 1010;
    /// Out of memory.
    pub const OUT_OF_MEMORY: u16 = 1011;
    /// Not implemented.
    pub const NOT_IMPLEMENTED: u16 = 1012;
    /// Invalid address.
    pub const INVALID_ADDRESS: u16 = 1013;
    /// Invalid pointer.
    pub const INVALID_POINTER: u16 = 1014;
    /// Invalid handle.
    pub const INVALID_HANDLE: u16 = 1015;
    /// Not initialized.
    pub const NOT_INITIALIZED: u16 = 1016;
    /// Already initialized.
    pub const ALREADY_INITIALIZED: u16 = 1017;
    /// Not found.
    pub const NOT_FOUND: u16 = 1018;
    /// Cancel requested.
    pub const CANCEL_REQUESTED: u16 = 1019;
    /// Already exists.
    pub const ALREADY_EXISTS: u16 = 1020;
    /// Out of range.
    pub const OUT_OF_RANGE: u16 = 1021;
    /// Timeout.
    pub const TIMEOUT: u16 = 1022;
    /// Invalid result value.
    pub const INVALID_RESULT_VALUE: u16 = 1023;
}

/// A service result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCode(pub i32);

impl ResultCode {
    /// The canonical success value.
    pub const SUCCESS: Self = Self(0);

    /// Pack a result code from its fields. Out-of-range fields are masked.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn new(level: Level, summary: Summary, module: u8, description: u16) -> Self {
        let raw = ((level.bits() as u32 & 0x1F) << 27)
            | ((summary.bits() as u32 & 0x3F) << 21)
            | ((module as u32) << 10)
            | (description as u32 & 0x3FF);
        Self(raw as i32)
    }

    /// Wrap a raw value as returned by a service call.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw as i32)
    }

    /// The raw value as an unsigned word.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn raw(self) -> u32 {
        self.0 as u32
    }

    /// Whether this code denotes success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// Whether this code denotes failure.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// Severity field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn level(self) -> Level {
        Level::from_bits((self.raw() >> 27) as u8)
    }

    /// Summary field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn summary(self) -> Summary {
        Summary::from_bits(((self.raw() >> 21) & 0x3F) as u8)
    }

    /// Module field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn module(self) -> u8 {
        ((self.raw() >> 10) & 0xFF) as u8
    }

    /// Description field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn description(self) -> u16 {
        (self.raw() & 0x3FF) as u16
    }

    /// Convert into a `Result`, treating non-negative codes as success.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` when the code denotes failure.
    pub const fn into_result(self) -> Result<(), Self> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.raw())
    }
}

impl From<i32> for ResultCode {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_fields() {
        let rc = ResultCode::new(
            Level::Permanent,
            Summary::NotFound,
            17,
            description::NOT_FOUND,
        );
        assert!(rc.is_failure());
        assert_eq!(rc.level(), Level::Permanent);
        assert_eq!(rc.summary(), Summary::NotFound);
        assert_eq!(rc.module(), 17);
        assert_eq!(rc.description(), description::NOT_FOUND);
    }

    #[test]
    fn test_decode_known_code() {
        // Archive not found: permanent / not found / FS / 120.
        let rc = ResultCode::from_raw(0xD880_4478);
        assert_eq!(rc.level(), Level::Permanent);
        assert_eq!(rc.summary(), Summary::NotFound);
        assert_eq!(rc.module(), 17);
        assert_eq!(rc.description(), 120);
        assert_eq!(rc.to_string(), "0xD8804478");
    }

    #[test]
    fn test_success_values() {
        assert!(ResultCode::SUCCESS.is_success());
        assert!(ResultCode(1).is_success());
        assert!(ResultCode::SUCCESS.into_result().is_ok());
        assert_eq!(ResultCode(-1).into_result(), Err(ResultCode(-1)));
    }

    #[test]
    fn test_unnamed_fields_roundtrip() {
        assert_eq!(Level::from_bits(0x10), Level::Other(0x10));
        assert_eq!(Level::Other(0x10).bits(), 0x10);
        assert_eq!(Summary::from_bits(40), Summary::Other(40));
        assert_eq!(Summary::from_bits(63), Summary::InvalidResultValue);
    }
}
