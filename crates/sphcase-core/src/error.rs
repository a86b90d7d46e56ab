//! Error types for sphcase-core
//!
//! Errors fall into five categories:
//!
//! - **Invariant**: the case graph is already inconsistent (duplicate names,
//!   missing MK property records, tags outside the engine's mk ranges)
//! - **User input**: a request the caller can correct (unknown object, bad value)
//! - **Persistence**: unreadable or missing snapshots and companion documents
//! - **I/O**: filesystem and geometry host failures
//! - **Configuration**: malformed or invalid configuration layers

use std::path::PathBuf;

use thiserror::Error;

use crate::values::ObjectType;

/// Broad classification used by callers to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Invariant,
    UserInput,
    Persistence,
    Io,
    Configuration,
}

/// Core error type for case operations
#[derive(Debug, Error)]
pub enum Error {
    /// An object with the same name is already part of the case
    #[error("an object named '{0}' is already part of the case")]
    NameConflict(String),

    /// A referenced MK has no property record
    #[error("no MK properties registered for real mk {0}")]
    MissingMkProperties(u32),

    /// A group tag outside the engine's mk range for its object type
    #[error("mk {mk} is out of range for {object_type} objects (limit {limit})")]
    MkOutOfRange {
        object_type: ObjectType,
        mk: u32,
        limit: u32,
    },

    /// Object is not part of the case
    #[error("object '{0}' is not part of the case")]
    ObjectNotFound(String),

    /// Rejected input value
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Snapshot could not be reconstructed
    #[error("snapshot is corrupt: {0}")]
    SnapshotCorrupt(String),

    /// Snapshot written by a newer release
    #[error("snapshot protocol {found} is newer than the supported protocol {supported}")]
    UnsupportedProtocol { found: u32, supported: u32 },

    /// Expected snapshot or companion document is missing
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    IoError(String),

    /// Geometry host failure
    #[error("geometry host error: {0}")]
    Host(String),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed configuration or companion document
    #[error("parse error: {0}")]
    ParseError(String),
}

impl Error {
    /// Classify the error according to the case error taxonomy.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NameConflict(_) | Self::MissingMkProperties(_) | Self::MkOutOfRange { .. } => {
                ErrorCategory::Invariant
            }
            Self::ObjectNotFound(_) | Self::InvalidInput(_) => ErrorCategory::UserInput,
            Self::SnapshotCorrupt(_) | Self::UnsupportedProtocol { .. } | Self::FileNotFound(_) => {
                ErrorCategory::Persistence
            }
            Self::IoError(_) | Self::Host(_) => ErrorCategory::Io,
            Self::InvalidConfig(_) | Self::ParseError(_) => ErrorCategory::Configuration,
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// Exit code scheme:
    /// - 1: User error (invalid input, bad configuration)
    /// - 2: System error (IO, geometry host)
    /// - 3: Not found (objects, snapshots, companion documents)
    /// - 4: Invalid state (invariant violation, snapshot corruption)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) | Self::InvalidConfig(_) | Self::ParseError(_) => 1,
            Self::IoError(_) | Self::Host(_) => 2,
            Self::ObjectNotFound(_) | Self::FileNotFound(_) => 3,
            Self::NameConflict(_)
            | Self::MissingMkProperties(_)
            | Self::MkOutOfRange { .. }
            | Self::SnapshotCorrupt(_)
            | Self::UnsupportedProtocol { .. } => 4,
        }
    }

    /// Create an I/O error annotated with the path involved.
    pub fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::IoError(format!("{}: {err}", path.display()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::ParseError(format!("Failed to parse config: {err}"))
    }
}

/// Result type alias for case operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_errors_are_invalid_state() {
        let err = Error::NameConflict("Box".to_string());
        assert_eq!(err.category(), ErrorCategory::Invariant);
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_user_errors_are_distinct_from_invariants() {
        let err = Error::ObjectNotFound("Ghost".to_string());
        assert_eq!(err.category(), ErrorCategory::UserInput);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_mk_out_of_range_display() {
        let err = Error::MkOutOfRange {
            object_type: ObjectType::Fluid,
            mk: 12,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "mk 12 is out of range for fluid objects (limit 10)"
        );
    }

    #[test]
    fn test_file_not_found_is_persistence() {
        let err = Error::FileNotFound(PathBuf::from("/tmp/missing.sphc"));
        assert_eq!(err.category(), ErrorCategory::Persistence);
        assert!(err.to_string().contains("missing.sphc"));
    }
}
