//! Human-readable summaries of service result codes.

use ctr_common::result::{ResultCode, Summary};

/// A short summary of what a service error means.
///
/// Keyed on the summary field of the code, so every module's errors map to
/// one of a dozen strings. Codes with an unnamed summary read `"Unknown."`.
#[must_use]
pub fn str_error(code: ResultCode) -> &'static str {
    match code.summary() {
        Summary::Success => "Success.",
        Summary::Nop => "Nothing happened.",
        Summary::WouldBlock => "Would block.",
        Summary::OutOfResource => "Not enough resources.",
        Summary::NotFound => "Not found.",
        Summary::InvalidState => "Invalid state.",
        Summary::NotSupported => "Unsupported.",
        Summary::InvalidArg => "Invalid argument.",
        Summary::WrongArg => "Wrong argument.",
        Summary::Canceled => "Interrupted.",
        Summary::StatusChanged => "Status changed.",
        Summary::Internal => "Internal error.",
        Summary::InvalidResultValue | Summary::Other(_) => "Unknown.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctr_common::result::Level;

    #[test]
    fn test_known_summaries() {
        assert_eq!(str_error(ResultCode::SUCCESS), "Success.");
        assert_eq!(str_error(ResultCode::from_raw(0xD880_4478)), "Not found.");
        assert_eq!(
            str_error(ResultCode::new(Level::Usage, Summary::InvalidArg, 1, 1005)),
            "Invalid argument."
        );
        assert_eq!(
            str_error(ResultCode::new(Level::Temporary, Summary::WouldBlock, 0, 0)),
            "Would block."
        );
    }

    #[test]
    fn test_unknown_summary() {
        assert_eq!(
            str_error(ResultCode::new(Level::Fatal, Summary::Other(30), 0, 0)),
            "Unknown."
        );
        assert_eq!(str_error(ResultCode(-1)), "Unknown.");
    }
}
