//! Error types for the adapter.
//!
//! Upstream syntax errors are not errors at this level: they are replayed as
//! `parse_error` events and the adapter returns `Ok(None)`. What remains are
//! shapes the walker has no translation for, and internal consistency
//! failures between the walker and the event vocabulary.
//!
//! ## Exit Codes
//!
//! The CLI maps outcomes onto process exit codes via [`ExitStatus`]:
//! - `1`: the source has syntax errors
//! - `2`: the tree contains an unsupported construct
//! - `3`: reading input or writing output failed
//! - `10`: internal errors (an event the vocabulary does not define)

use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Process exit codes used by the `riptide` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    SyntaxError = 1,
    Unsupported = 2,
    Io = 3,
    Internal = 10,
}

impl ExitStatus {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

// ============================================================================
// Adapter Errors
// ============================================================================

/// Errors that abort a single `parse` call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The tree contains a shape with no legacy translation.
    #[error("unsupported construct at {line}:{column}: {construct}")]
    Unsupported {
        construct: String,
        line: u32,
        column: u32,
    },

    /// An event was emitted with the wrong number of arguments.
    #[error("event `{event}` expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        event: String,
        expected: usize,
        actual: usize,
    },

    /// An event name outside the legacy vocabulary.
    #[error("unknown event `{event}`")]
    UnknownEvent { event: String },
}

impl AdapterError {
    pub fn unsupported(construct: impl Into<String>, line: u32, column: u32) -> Self {
        AdapterError::Unsupported {
            construct: construct.into(),
            line,
            column,
        }
    }

    /// The exit status the CLI reports for this error.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            AdapterError::Unsupported { .. } => ExitStatus::Unsupported,
            AdapterError::ArityMismatch { .. } | AdapterError::UnknownEvent { .. } => {
                ExitStatus::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_includes_position() {
        let error = AdapterError::unsupported("call operator `::`", 3, 4);
        assert_eq!(
            error.to_string(),
            "unsupported construct at 3:4: call operator `::`"
        );
        assert_eq!(error.exit_status(), ExitStatus::Unsupported);
    }

    #[test]
    fn test_internal_errors_map_to_internal_exit_code() {
        let error = AdapterError::ArityMismatch {
            event: "binary".to_string(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(error.exit_status().code(), 10);
        assert_eq!(
            error.to_string(),
            "event `binary` expects 3 argument(s), got 2"
        );
    }
}
