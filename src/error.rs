//! Error types for OBJ import.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that can occur while importing an OBJ file.
///
/// Every parsing failure carries the 1-based line number of the offending
/// record so callers can point back into the source file. An import either
/// fully succeeds or fails with one of these; nothing is recovered or
/// defaulted internally.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Error reading the source file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record line with the wrong field count or a field that does not
    /// parse.
    #[error("line {line}: malformed record `{text}`: {reason}")]
    Parse {
        line: usize,
        text: String,
        reason: String,
    },

    /// A face with fewer than 3 or more than 4 corners.
    #[error("line {line}: face has {arity} corners, only triangles and quads are supported")]
    UnsupportedFaceArity { line: usize, arity: usize },

    /// A `vn` record whose vector has zero length and cannot be normalized.
    #[error("line {line}: zero-length normal cannot be normalized")]
    ZeroLengthNormal { line: usize },

    /// A face referencing an index outside its attribute table. The index
    /// is reported as written in the file (1-based).
    #[error("line {line}: {attribute} index {index} is out of range of the {table_len}-entry table")]
    IndexOutOfRange {
        line: usize,
        attribute: &'static str,
        index: i64,
        table_len: usize,
    },
}
