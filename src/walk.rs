//! Lazy pre-order tree walker.
//!
//! [`TreeWalk`] yields one [`DirListing`] per directory, depth-first and
//! parent-before-child, root first. Each listing carries the directory's
//! immediate subdirectory and file names, so the engine sees the same
//! directory-grouped view over both the source and the replica tree.
//!
//! The walk is restartable (every construction re-reads the filesystem)
//! and tolerates a missing root by yielding nothing, which is exactly the
//! state of a replica that has never been created. A directory that cannot
//! be enumerated surfaces as one `Err` item; the walk then carries on with
//! the remaining reachable directories.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SpecchioError};

/// The immediate contents of one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    /// Absolute path of the directory itself.
    pub path: PathBuf,
    /// Names of immediate subdirectories, sorted by file name.
    ///
    /// Only real directories count; a symlink to a directory is listed in
    /// `files` so the engine's symlink policy applies to it.
    pub dirs: Vec<OsString>,
    /// Names of immediate non-directory entries (regular files, symlinks,
    /// specials), sorted by file name.
    pub files: Vec<OsString>,
}

/// Depth-first pre-order iterator of [`DirListing`]s under a root.
#[derive(Debug)]
pub struct TreeWalk {
    // Pending directories, popped LIFO. Subdirectories are pushed in
    // reverse name order so the walk visits them name-ascending.
    pending: Vec<PathBuf>,
}

impl TreeWalk {
    /// Start a walk rooted at `root`.
    ///
    /// A root that does not exist (or is not a directory) produces an
    /// empty sequence rather than an error.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let pending = if root.is_dir() {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
        Self { pending }
    }

    /// Enumerate the immediate children of one directory.
    fn list_dir(dir: &Path) -> Result<DirListing> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in entries {
            let entry = entry.map_err(|source| SpecchioError::TreeWalk {
                path: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name().to_os_string();
            if entry.file_type().is_dir() {
                dirs.push(name);
            } else {
                files.push(name);
            }
        }

        Ok(DirListing {
            path: dir.to_path_buf(),
            dirs,
            files,
        })
    }
}

impl Iterator for TreeWalk {
    type Item = Result<DirListing>;

    fn next(&mut self) -> Option<Self::Item> {
        let dir = self.pending.pop()?;
        match Self::list_dir(&dir) {
            Ok(listing) => {
                for name in listing.dirs.iter().rev() {
                    self.pending.push(listing.path.join(name));
                }
                Some(Ok(listing))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
