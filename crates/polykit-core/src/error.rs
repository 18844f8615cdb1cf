//! Error handling for polykit
//!
//! Provides the error types used across the workspace:
//! - Geometry errors (contract violations raised by the polygon-set engine)
//! - The top-level `Error` wrapper used by callers that also touch files
//!
//! Geometric degeneracies (a hole that cannot be bridged, an outline that
//! refuses to triangulate) are not errors: they are logged and skipped.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised when a caller breaks the contract of a polygon-set operation.
/// These are not expected in correct calling code and are never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A polygon, contour or vertex index does not exist
    #[error("{what} index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// What kind of index was out of range.
        what: &'static str,
        /// The requested index.
        index: usize,
        /// The number of valid entries.
        count: usize,
    },

    /// The operation needs at least one outline
    #[error("Operation requires a non-empty polygon set")]
    EmptySet,

    /// Boolean operation attempted on curved multi-outline input
    #[error("Boolean operations on curved polygons are not supported; clear arcs first")]
    ArcsInBooleanOp,

    /// A parameter is outside its valid domain
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A working buffer could not be allocated
    #[error("Allocation failed: {0}")]
    Allocation(String),

    /// The textual dump could not be parsed
    #[error("Parse error at token {position}: {reason}")]
    Parse {
        /// Zero-based token position where parsing failed.
        position: usize,
        /// What was expected or found.
        reason: String,
    },
}

impl GeometryError {
    /// Shorthand for an out-of-range error.
    pub fn out_of_range(what: &'static str, index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { what, index, count }
    }

    /// Shorthand for an invalid-parameter error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<std::collections::TryReserveError> for GeometryError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::Allocation(err.to_string())
    }
}

/// Main error type for polykit
///
/// Wraps geometry errors and I/O failures for callers that load dumps or
/// configuration from disk.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry contract violation
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{message}")]
    Other {
        /// The error message.
        message: String,
    },
}

impl Error {
    /// Create a generic error with a message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether this error came from the geometry engine
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Self::Geometry(_))
    }
}

/// Result type alias using polykit's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for geometry operations
pub type GeometryResult<T> = std::result::Result<T, GeometryError>;
