use std::path::PathBuf;
use thiserror::Error;

/// Result type for operations that can produce FindError
pub type FindResult<T> = Result<T, FindError>;

/// Errors surfaced to the caller of a search.
///
/// Problems with individual entries (unreadable directories, broken
/// symlinks, files deleted mid-walk) never become a `FindError`; the walker
/// reports them as [`crate::finder::walker::SkipReason`] and moves on.
#[derive(Debug, Error)]
pub enum FindError {
    /// Size string could not be parsed
    #[error("invalid size '{input}': {reason}")]
    InvalidSize { input: String, reason: String },

    /// Unknown sort key
    #[error("invalid sort key '{0}' (expected one of: path, size, mtime)")]
    InvalidSortKey(String),

    /// Limit must be a positive integer
    #[error("invalid limit {0}: must be a positive integer")]
    InvalidLimit(i64),

    /// More than one output format was requested
    #[error("use only one of: --table, --csv, --json")]
    ConflictingOutput,

    /// Search root does not exist
    #[error("root path not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Search root exists but is not a directory
    #[error("root path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// I/O failure on a specific path
    #[error("filesystem error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Worker pool for parallel mode could not be created
    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),

    /// Failure while rendering results
    #[error("output error: {0}")]
    Output(String),
}

impl FindError {
    /// Whether this error comes from resolving configuration, before any
    /// traversal started.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FindError::InvalidSize { .. }
                | FindError::InvalidSortKey(_)
                | FindError::InvalidLimit(_)
                | FindError::ConflictingOutput
        )
    }

    /// Whether this error means the search root is unusable.
    pub fn is_root_error(&self) -> bool {
        matches!(self, FindError::RootNotFound(_) | FindError::NotADirectory(_))
    }
}

impl From<csv::Error> for FindError {
    fn from(err: csv::Error) -> Self {
        FindError::Output(err.to_string())
    }
}

impl From<serde_json::Error> for FindError {
    fn from(err: serde_json::Error) -> Self {
        FindError::Output(err.to_string())
    }
}

impl From<std::io::Error> for FindError {
    fn from(err: std::io::Error) -> Self {
        FindError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_display() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let find_error = FindError::Io {
            path: PathBuf::from("/test/path"),
            source: io_error,
        };
        assert_eq!(
            find_error.to_string(),
            "filesystem error at /test/path: file not found"
        );
    }

    #[test]
    fn test_root_not_found_display() {
        let find_error = FindError::RootNotFound(PathBuf::from("/invalid/path"));
        assert_eq!(find_error.to_string(), "root path not found: /invalid/path");
        assert!(find_error.is_root_error());
        assert!(!find_error.is_config_error());
    }

    #[test]
    fn test_config_error_classification() {
        assert!(FindError::InvalidLimit(0).is_config_error());
        assert!(FindError::InvalidSortKey("name".into()).is_config_error());
        assert!(FindError::ConflictingOutput.is_config_error());
        assert!(FindError::InvalidSize {
            input: "abc".into(),
            reason: "missing number".into(),
        }
        .is_config_error());
        assert!(!FindError::Output("broken pipe".into()).is_config_error());
    }
}
