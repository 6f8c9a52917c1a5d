//! Unified error handling for algosix
//!
//! Engines and tracked services fail fast with one of these variants; the
//! HTTP layer maps each variant to a status code and a machine-readable code.

use std::fmt;

use http::StatusCode;

/// Unified error types for the algorithm services
#[derive(Debug)]
pub enum AlgoError {
    /// Malformed or missing request shape, scoped to a field when known
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Precondition violation on median inputs or a partition-search invariant failure
    ArrayOperation(String),

    /// Non-string input to a palindrome operation
    PalindromeOperation(String),

    /// Internal system errors
    Internal(String),
}

impl AlgoError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AlgoError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn validation_unscoped(message: impl Into<String>) -> Self {
        AlgoError::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Error kind name as reported in batch results.
    pub fn type_name(&self) -> &'static str {
        match self {
            AlgoError::Validation { .. } => "ValidationError",
            AlgoError::ArrayOperation(_) => "ArrayOperationError",
            AlgoError::PalindromeOperation(_) => "PalindromeOperationError",
            AlgoError::Internal(_) => "InternalError",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AlgoError::Validation { .. } => "VALIDATION_ERROR",
            AlgoError::ArrayOperation(_) => "ARRAY_OPERATION_ERROR",
            AlgoError::PalindromeOperation(_) => "PALINDROME_OPERATION_ERROR",
            AlgoError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AlgoError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AlgoError::ArrayOperation(_) | AlgoError::PalindromeOperation(_) => {
                StatusCode::BAD_REQUEST
            }
            AlgoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The bare message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            AlgoError::Validation { message, .. } => message.clone(),
            AlgoError::ArrayOperation(msg)
            | AlgoError::PalindromeOperation(msg)
            | AlgoError::Internal(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for AlgoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgoError::Validation {
                field: Some(field),
                message,
            } => write!(f, "Validation error on '{field}': {message}"),
            AlgoError::Validation {
                field: None,
                message,
            } => write!(f, "Validation error: {message}"),
            AlgoError::ArrayOperation(msg) => write!(f, "Array operation error: {msg}"),
            AlgoError::PalindromeOperation(msg) => write!(f, "Palindrome operation error: {msg}"),
            AlgoError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for AlgoError {}

/// Result type alias for algorithm operations
pub type AlgoResult<T> = std::result::Result<T, AlgoError>;

#[macro_export]
macro_rules! array_error {
    ($msg:expr) => {
        $crate::core::AlgoError::ArrayOperation($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::AlgoError::ArrayOperation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! palindrome_error {
    ($msg:expr) => {
        $crate::core::AlgoError::PalindromeOperation($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::AlgoError::PalindromeOperation(format!($fmt, $($arg)*))
    };
}
