use crate::result::ResultCode;
use thiserror::Error;

/// Platform error types covering configuration, service calls, and record access.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OsError {
    /// Configuration or initialization error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A supervisor or service call returned a failure code.
    #[error("{call} failed with result {code}")]
    Service {
        /// Name of the failing call.
        call: &'static str,
        /// Returned result code.
        code: ResultCode,
    },

    /// A value read from hardware or a record is outside its documented range.
    #[error("{what} out of range: {value}")]
    OutOfRange {
        /// Name of the value.
        what: &'static str,
        /// Offending value.
        value: u64,
    },

    /// An address could not be translated.
    #[error("unmapped address 0x{0:08X}")]
    Unmapped(u32),
}

impl OsError {
    /// Build a [`OsError::Service`] for the named call.
    #[must_use]
    pub fn service(call: &'static str, code: ResultCode) -> Self {
        Self::Service { call, code }
    }
}

/// Convenience type alias for platform operations.
pub type OsResult<T> = Result<T, OsError>;
