//! Core error types for Strata.

use thiserror::Error;

/// Result type alias using `StrataError`.
pub type StrataResult<T> = std::result::Result<T, StrataError>;

/// Core error type for Strata operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// Content does not match a format's grammar at all.
    #[error("SyntaxError: {0}")]
    Syntax(String),

    /// Grammar matched but semantic rules of the format were violated.
    #[error("InvalidContentError: {0}")]
    InvalidContent(String),

    /// A file to decode does not exist.
    #[error("FileNotFoundError: {0}")]
    FileNotFound(String),

    /// IO error.
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument passed to a container or format API.
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),

    /// Index or id outside the valid range.
    #[error("OutOfBounds: {0}")]
    OutOfBounds(String),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (bug in Strata).
    #[error("InternalError: {0}")]
    Internal(String),
}

impl StrataError {
    /// Create a new `Syntax` error.
    pub fn syntax<S: Into<String>>(msg: S) -> Self {
        Self::Syntax(msg.into())
    }

    /// Create a new `InvalidContent` error.
    pub fn invalid_content<S: Into<String>>(msg: S) -> Self {
        Self::InvalidContent(msg.into())
    }

    /// Create a new `FileNotFound` error.
    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        Self::FileNotFound(path.into())
    }

    /// Create a new `InvalidArgument` error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new `OutOfBounds` error.
    pub fn out_of_bounds<S: Into<String>>(msg: S) -> Self {
        Self::OutOfBounds(msg.into())
    }

    /// Create a new `Internal` error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// True for errors raised because input did not match a grammar.
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// True for errors raised because matched input was semantically invalid.
    pub const fn is_invalid_content(&self) -> bool {
        matches!(self, Self::InvalidContent(_))
    }

    /// True for caller contract violations (`InvalidArgument` / `OutOfBounds`).
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::OutOfBounds(_))
    }
}

/// Ensure a condition holds, returning an error if not.
///
/// The error variant defaults to `InvalidArgument`; prefix the message with
/// `Variant:` to pick another.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::StrataError::$variant(format!($($msg)*)));
        }
    };
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::StrataError::InvalidArgument($msg.to_string()));
        }
    };
}

/// Return early with an `InvalidArgument` error.
#[macro_export]
macro_rules! invalid_argument_err {
    ($($arg:tt)*) => {
        return Err($crate::StrataError::InvalidArgument(format!($($arg)*)))
    };
}

/// Return early with an `OutOfBounds` error.
#[macro_export]
macro_rules! out_of_bounds_err {
    ($($arg:tt)*) => {
        return Err($crate::StrataError::OutOfBounds(format!($($arg)*)))
    };
}

/// Return early with an `InvalidContent` error.
#[macro_export]
macro_rules! invalid_content_err {
    ($($arg:tt)*) => {
        return Err($crate::StrataError::InvalidContent(format!($($arg)*)))
    };
}
