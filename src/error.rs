//! Error types for specchio operations.
//!
//! Every variant is scoped to a single filesystem entry: the engine
//! converts each one into an error event at the point of occurrence and
//! moves on to the next entry. Nothing here aborts a synchronization pass.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while mirroring a single filesystem entry.
#[derive(Error, Debug)]
pub enum SpecchioError {
    /// A walked path could not be re-rooted onto the opposite tree.
    ///
    /// Only produced when the walker hands back a path that is not nested
    /// under the root it was given, which indicates the tree changed
    /// underneath the pass.
    #[error("path {path} is not nested under the walked root")]
    PathResolution {
        /// The path that failed to map.
        path: PathBuf,
    },

    /// A directory could not be enumerated during a tree walk.
    #[error("failed to read directory {path}: {source}")]
    TreeWalk {
        /// The directory that could not be read.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// Filesystem metadata could not be read for a comparison.
    #[error("failed to stat {path}: {source}")]
    Metadata {
        /// The entry that could not be stat'ed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A replica directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// The replica directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file could not be copied from source to replica.
    #[error("failed to copy {from} to {to}: {source}")]
    FileCopy {
        /// Source file.
        from: PathBuf,
        /// Replica destination.
        to: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A replica-only file could not be removed.
    #[error("failed to remove file {path}: {source}")]
    FileRemove {
        /// The replica file that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A replica-only directory could not be removed.
    #[error("failed to remove directory {path}: {source}")]
    DirectoryRemove {
        /// The replica directory that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A content digest could not be computed.
    #[error("failed to digest {path}: {source}")]
    DigestCompute {
        /// The file that could not be read for hashing.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl SpecchioError {
    /// The filesystem entry this error is scoped to.
    ///
    /// For copy failures this is the replica destination, since that is
    /// the entry the pass failed to bring up to date.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::PathResolution { path }
            | Self::TreeWalk { path, .. }
            | Self::Metadata { path, .. }
            | Self::DirectoryCreate { path, .. }
            | Self::FileRemove { path, .. }
            | Self::DirectoryRemove { path, .. }
            | Self::DigestCompute { path, .. } => path,
            Self::FileCopy { to, .. } => to,
        }
    }
}

/// Result type for specchio operations.
pub type Result<T> = std::result::Result<T, SpecchioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn error_display_path_resolution() {
        let err = SpecchioError::PathResolution {
            path: PathBuf::from("/outside/root"),
        };
        assert!(err.to_string().contains("/outside/root"));
        assert!(err.to_string().contains("not nested"));
    }

    #[test]
    fn error_display_directory_create() {
        let err = SpecchioError::DirectoryCreate {
            path: PathBuf::from("/replica/sub"),
            source: io_err(),
        };
        let msg = err.to_string();
        assert!(msg.contains("create directory"));
        assert!(msg.contains("/replica/sub"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn error_display_file_copy_names_both_ends() {
        let err = SpecchioError::FileCopy {
            from: PathBuf::from("/src/a.txt"),
            to: PathBuf::from("/rep/a.txt"),
            source: io_err(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/src/a.txt"));
        assert!(msg.contains("/rep/a.txt"));
    }

    #[test]
    fn error_display_digest_compute() {
        let err = SpecchioError::DigestCompute {
            path: PathBuf::from("/src/big.bin"),
            source: io_err(),
        };
        assert!(err.to_string().contains("digest"));
    }

    #[test]
    fn path_accessor_returns_scoped_entry() {
        let err = SpecchioError::FileRemove {
            path: PathBuf::from("/rep/stale.txt"),
            source: io_err(),
        };
        assert_eq!(err.path(), Path::new("/rep/stale.txt"));

        let err = SpecchioError::FileCopy {
            from: PathBuf::from("/src/a"),
            to: PathBuf::from("/rep/a"),
            source: io_err(),
        };
        assert_eq!(err.path(), Path::new("/rep/a"));
    }

    #[test]
    fn result_type_ok() {
        let result: Result<i32> = Ok(42);
        assert_eq!(result.unwrap_or(0), 42);
    }
}
