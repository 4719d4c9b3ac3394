//! Typed errors raised in place of native failure sentinels.
//!
//! One variant per wrapped domain so callers can discriminate pattern
//! failures from network failures without string inspection. Errors are
//! constructed only at the moment a wrapper detects a sentinel result and
//! are immutable afterwards.

use thiserror::Error;

use crate::registry::{self, Domain};

/// Fixed diagnostic used when the native runtime left no message behind.
pub const GENERIC_FAILURE: &str = "operation failed";

/// Structured error carrying the failing operation's name plus the best
/// diagnostic available from the native runtime at the moment of failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SafeError {
    /// Pattern-matching / text-processing failure (malformed pattern,
    /// engine-internal failure).
    #[error("{operation}: {message}")]
    Pcre {
        operation: &'static str,
        message: String,
    },
    /// Network, name-resolution, socket, or address-conversion failure.
    #[error("{operation}: {message}")]
    Network {
        operation: &'static str,
        /// System error number (errno) or resolver code, when one exists.
        code: Option<i32>,
        message: String,
    },
}

/// Result alias used throughout the wrapper layer.
pub type SafeResult<T> = Result<T, SafeError>;

impl SafeError {
    /// Builds the error for `operation`, classifying the domain through the
    /// operation registry. Empty diagnostics fall back to [`GENERIC_FAILURE`].
    ///
    /// # Panics
    ///
    /// Panics if `operation` is not registered; every wrapper must have a
    /// descriptor in [`registry::OPERATIONS`].
    pub fn for_operation(
        operation: &'static str,
        code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        let desc = registry::descriptor(operation)
            .unwrap_or_else(|| panic!("unregistered operation: {operation}"));
        let mut message = message.into();
        if message.is_empty() {
            message = GENERIC_FAILURE.to_string();
        }
        match desc.domain {
            Domain::Pcre => SafeError::Pcre { operation, message },
            Domain::Network => SafeError::Network {
                operation,
                code,
                message,
            },
        }
    }

    /// Name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            SafeError::Pcre { operation, .. } => operation,
            SafeError::Network { operation, .. } => operation,
        }
    }

    /// Diagnostic text captured at the moment of failure. Never empty.
    pub fn message(&self) -> &str {
        match self {
            SafeError::Pcre { message, .. } => message,
            SafeError::Network { message, .. } => message,
        }
    }

    /// System/resolver error number, when the failing domain has one.
    pub fn code(&self) -> Option<i32> {
        match self {
            SafeError::Pcre { .. } => None,
            SafeError::Network { code, .. } => *code,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_classification_flows_through_registry() {
        let e = SafeError::for_operation("split", None, "bad pattern");
        assert!(matches!(e, SafeError::Pcre { .. }));

        let e = SafeError::for_operation("gethostname", Some(22), "Invalid argument");
        assert!(matches!(e, SafeError::Network { code: Some(22), .. }));
    }

    #[test]
    fn test_empty_diagnostic_falls_back_to_generic() {
        let e = SafeError::for_operation("long2ip", None, "");
        assert_eq!(e.message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_accessors() {
        let e = SafeError::for_operation("dns_records", Some(-2), "Name or service not known");
        assert_eq!(e.operation(), "dns_records");
        assert_eq!(e.code(), Some(-2));
        assert_eq!(e.to_string(), "dns_records: Name or service not known");
    }

    #[test]
    #[should_panic(expected = "unregistered operation")]
    fn test_unregistered_operation_panics() {
        let _ = SafeError::for_operation("no_such_op", None, "x");
    }
}
