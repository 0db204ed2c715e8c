use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use ts_rs::TS;

/// Errors raised by the rename engine.
///
/// Planning errors (`InvalidPattern`, `CollisionUnresolvable`) abort plan
/// building before anything touches the disk. `FileSystem` errors during apply
/// are captured per operation in the `ApplyResult` instead of being returned.
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("could not find a free name for '{name}' after {attempts} attempts")]
    CollisionUnresolvable { name: String, attempts: usize },

    #[error("{kind} for {}: {message}", path.display())]
    FileSystem {
        path: PathBuf,
        kind: FsErrorKind,
        message: String,
    },

    #[error("nothing to undo: no rename has been applied in this session")]
    UndoUnavailable,
}

impl RenameError {
    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern(message.into())
    }

    pub fn from_io(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            kind: FsErrorKind::from_io(err),
            message: err.to_string(),
        }
    }
}

/// Classification of a per-operation file-system failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FsErrorKind {
    SourceMissing,
    DestinationExists,
    PermissionDenied,
    PathTooLong,
    Other,
}

impl FsErrorKind {
    pub fn from_io(err: &io::Error) -> Self {
        if is_name_too_long(err) {
            return Self::PathTooLong;
        }

        match err.kind() {
            io::ErrorKind::NotFound => Self::SourceMissing,
            io::ErrorKind::AlreadyExists => Self::DestinationExists,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceMissing => "source missing",
            Self::DestinationExists => "destination exists",
            Self::PermissionDenied => "permission denied",
            Self::PathTooLong => "path too long",
            Self::Other => "file system error",
        }
    }
}

impl fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(unix)]
fn is_name_too_long(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ENAMETOOLONG)
}

#[cfg(windows)]
fn is_name_too_long(err: &io::Error) -> bool {
    // ERROR_FILENAME_EXCED_RANGE
    err.raw_os_error() == Some(206)
}

#[cfg(not(any(unix, windows)))]
fn is_name_too_long(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_kind_mapping() {
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(FsErrorKind::from_io(&not_found), FsErrorKind::SourceMissing);

        let exists = io::Error::new(io::ErrorKind::AlreadyExists, "taken");
        assert_eq!(FsErrorKind::from_io(&exists), FsErrorKind::DestinationExists);

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(FsErrorKind::from_io(&denied), FsErrorKind::PermissionDenied);

        let other = io::Error::new(io::ErrorKind::Interrupted, "eintr");
        assert_eq!(FsErrorKind::from_io(&other), FsErrorKind::Other);
    }

    #[cfg(unix)]
    #[test]
    fn test_name_too_long_mapping() {
        let err = io::Error::from_raw_os_error(libc::ENAMETOOLONG);
        assert_eq!(FsErrorKind::from_io(&err), FsErrorKind::PathTooLong);
    }

    #[test]
    fn test_error_display() {
        let err = RenameError::from_io(
            "/tmp/a.txt",
            &io::Error::new(io::ErrorKind::NotFound, "No such file"),
        );
        let message = err.to_string();
        assert!(message.contains("source missing"));
        assert!(message.contains("a.txt"));

        assert!(RenameError::UndoUnavailable
            .to_string()
            .contains("nothing to undo"));
    }
}
