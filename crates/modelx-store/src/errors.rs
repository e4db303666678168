//! Error handling for modelx-store
//!
//! Wraps modelx-core ExError with store-specific helpers

use std::fmt::Display;
use std::path::Path;

use modelx_core::errors::{ExError, ExErrorKind};
use modelx_core_types::ProjectId;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Project directory could not be created
pub fn directory_error(path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Directory)
        .with_op("create_dir")
        .with_path(path)
        .with_message(err.to_string())
}

/// A single document write failed
pub fn write_error(path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Write)
        .with_op("write_document")
        .with_path(path)
        .with_message(err.to_string())
}

/// A required document is missing or unreadable
pub fn read_error(path: &Path, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::Read)
        .with_op("read_document")
        .with_path(path)
        .with_message(err.to_string())
}

/// Orphan file could not be removed
pub fn delete_error(path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Delete)
        .with_op("delete_orphan")
        .with_path(path)
        .with_message(err.to_string())
}

/// Malformed document structure
pub fn parse_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Parse).with_message(reason)
}

/// Declared name mismatch or unresolved Model/Instance
pub fn integrity_error(qualified_name: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Integrity)
        .with_qualified_name(qualified_name)
        .with_message(reason)
}

/// Type tag outside the closed set of known kinds
pub fn unsupported_type(tag: &str) -> ExError {
    ExError::new(ExErrorKind::UnsupportedType).with_message(format!("unknown type tag '{}'", tag))
}

/// Value does not have the type it is written under
pub fn type_mismatch(expected: impl Display, found: impl Display) -> ExError {
    ExError::new(ExErrorKind::TypeMismatch)
        .with_message(format!("expected {}, found {}", expected, found))
}

/// Collection nesting beyond what open will accept
pub fn depth_exceeded(max_depth: usize) -> ExError {
    ExError::new(ExErrorKind::InvalidInput).with_message(format!(
        "value nesting exceeds maximum depth {}",
        max_depth
    ))
}

/// Character that XML 1.0 cannot carry, not even as a reference
pub fn illegal_char(c: char) -> ExError {
    ExError::new(ExErrorKind::InvalidInput).with_message(format!(
        "character U+{:04X} cannot be written to an XML document",
        c as u32
    ))
}

/// Invalid store options
pub fn config_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_options")
        .with_message(reason)
}

/// Aggregate commit failure wrapping the first underlying error
pub fn commit_error(source: ExError) -> ExError {
    ExError::new(ExErrorKind::Commit)
        .with_op("commit")
        .with_message("commit aborted")
        .with_source(source)
}

/// Aggregate open failure wrapping the first underlying error
pub fn open_error(source: ExError) -> ExError {
    ExError::new(ExErrorKind::Open)
        .with_op("open")
        .with_message("open aborted")
        .with_source(source)
}

/// Project has no directory binding
pub fn not_registered(project_id: &ProjectId) -> ExError {
    ExError::new(ExErrorKind::NotRegistered)
        .with_message(format!("project {} is not registered", project_id))
}

/// Background task panicked or was cancelled
pub fn task_error(op: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_io_helpers_carry_path() {
        let path = PathBuf::from("one/m-model_one.xml");
        let err = write_error(&path, std::io::Error::other("disk full"));

        assert_eq!(err.kind(), ExErrorKind::Write);
        assert_eq!(err.code(), "ERR_WRITE");
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(err.message().contains("disk full"));
    }

    #[test]
    fn test_commit_error_wraps_source() {
        let inner = directory_error(Path::new("/nope"), std::io::Error::other("denied"));
        let err = commit_error(inner);

        assert_eq!(err.kind(), ExErrorKind::Commit);
        assert_eq!(
            err.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Directory)
        );
        assert_eq!(err.root_cause().kind(), ExErrorKind::Directory);
    }
}
