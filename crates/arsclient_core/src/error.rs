//! Error types for the client.

use crate::status::StatusMessage;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised by client operations.
///
/// Native resources allocated before a failure are always released before
/// the error reaches the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Initialization, port binding, or termination failed. Fatal to the
    /// connection; no further operations should be attempted on it.
    #[error("connection operation `{operation}` failed: {message}")]
    Connection {
        /// The entry point that failed.
        operation: &'static str,
        /// Human-readable summary.
        message: String,
        /// Decoded diagnostics of the failing call.
        status: Vec<StatusMessage>,
    },

    /// The session was terminated; the operation was rejected before any
    /// native call.
    #[error("session is terminated")]
    Terminated,

    /// A name contains an interior NUL byte and cannot cross the C boundary.
    #[error("name contains an interior NUL byte: {name:?}")]
    InvalidName {
        /// The offending name.
        name: String,
    },

    /// A requested field name is not present in the schema. Raised before
    /// any native allocation; recoverable by fixing the request.
    #[error("no field named {field:?} exists in schema {schema:?}")]
    UnknownField {
        /// The schema that was queried.
        schema: String,
        /// The unknown field name.
        field: String,
    },

    /// A native call reported an outcome at or above the error threshold.
    /// The connection remains usable.
    #[error("native call `{operation}` failed: {message}")]
    NativeCall {
        /// The entry point that failed.
        operation: &'static str,
        /// Human-readable summary.
        message: String,
        /// Decoded diagnostics of the failing call.
        status: Vec<StatusMessage>,
    },

    /// The server returned data violating its own contract (entry id count
    /// other than one, unknown enum ordinal, misaligned metadata lists).
    #[error("data integrity violation: {message}")]
    DataIntegrity {
        /// Description of the violation.
        message: String,
    },

    /// A declared limitation was hit (query-style enum, unrecognized data
    /// type tag). Never silently defaulted.
    #[error("unsupported feature: {message}")]
    Unsupported {
        /// Description of the limitation.
        message: String,
    },
}

impl ClientError {
    /// Creates a data integrity error.
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            message: message.into(),
        }
    }

    /// Creates an unsupported feature error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Returns the decoded diagnostics carried by this error, empty for
    /// error kinds that never carry any.
    pub fn status(&self) -> &[StatusMessage] {
        match self {
            Self::Connection { status, .. } | Self::NativeCall { status, .. } => status,
            _ => &[],
        }
    }

    /// Reclassifies a native call failure as a connection failure. Used by
    /// the session for the calls whose failure is fatal to the connection.
    pub(crate) fn into_connection(self) -> Self {
        match self {
            Self::NativeCall {
                operation,
                message,
                status,
            } => Self::Connection {
                operation,
                message,
                status,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Severity;

    #[test]
    fn status_accessor() {
        let err = ClientError::NativeCall {
            operation: "list_schemas",
            message: "boom".into(),
            status: vec![StatusMessage {
                severity: Severity::Error,
                code: 90,
                text: "cannot connect".into(),
                appended: None,
            }],
        };
        assert_eq!(err.status().len(), 1);
        assert!(ClientError::Terminated.status().is_empty());
    }

    #[test]
    fn native_failure_reclassifies_to_connection() {
        let err = ClientError::NativeCall {
            operation: "initialize",
            message: "boom".into(),
            status: Vec::new(),
        };
        assert!(matches!(
            err.into_connection(),
            ClientError::Connection {
                operation: "initialize",
                ..
            }
        ));
        let err = ClientError::Terminated;
        assert!(matches!(err.into_connection(), ClientError::Terminated));
    }

    #[test]
    fn display_includes_context() {
        let err = ClientError::UnknownField {
            schema: "Incident".into(),
            field: "Bogus".into(),
        };
        let text = err.to_string();
        assert!(text.contains("Incident"));
        assert!(text.contains("Bogus"));
    }
}
