//! One-way mirroring engine.
//!
//! A [`Mirror`] turns a (source, replica) pair of directory trees into
//! create/copy/delete operations in three strictly ordered phases:
//!
//! 1. **Create/update** — walk the source pre-order; create missing
//!    replica directories, copy every file the needs-update decision
//!    marks stale.
//! 2. **File removal** — walk the replica; delete every file with no
//!    source counterpart.
//! 3. **Directory removal** — walk the replica again, deepest directory
//!    first; delete every directory with no source counterpart. Phase 2
//!    plus the deepest-first order guarantees each candidate is already
//!    empty, so no subtree-emptiness check is needed.
//!
//! The engine holds no state across passes: each pass is a function of
//! the two trees on storage and the configuration, which makes a pass
//! idempotent and an interrupted pass recoverable by the next one. Every
//! per-entry failure is converted to an error event and the pass carries
//! on; one broken file never aborts a pass.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::compare;
use crate::error::{Result, SpecchioError};
use crate::event::{EventSink, SyncAction, SyncEvent};
use crate::walk::TreeWalk;

/// Configuration for a mirroring engine.
#[derive(Debug, Clone, Copy)]
pub struct MirrorConfig {
    /// Skip symlinks and special files on the source side, silently.
    pub skip_symlinks: bool,
    /// Propagate source modification times onto copied files and created
    /// directories.
    pub preserve_times: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            skip_symlinks: false,
            preserve_times: true,
        }
    }
}

/// Builder for creating mirroring engines with custom configuration.
///
/// # Example
///
/// ```rust
/// use specchio::MirrorBuilder;
///
/// let mirror = MirrorBuilder::new()
///     .skip_symlinks(true)
///     .build();
/// assert!(mirror.config().skip_symlinks);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MirrorBuilder {
    config: MirrorConfig,
}

impl MirrorBuilder {
    /// Create a new builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip symlinks and special source files instead of copying them.
    #[must_use]
    pub fn skip_symlinks(mut self, skip: bool) -> Self {
        self.config.skip_symlinks = skip;
        self
    }

    /// Enable or disable modification-time propagation.
    #[must_use]
    pub fn preserve_times(mut self, preserve: bool) -> Self {
        self.config.preserve_times = preserve;
        self
    }

    /// Build the mirroring engine.
    #[must_use]
    pub fn build(self) -> Mirror {
        Mirror {
            config: self.config,
        }
    }
}

/// Tallies of one synchronization pass, one counter per event kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Replica directories created.
    pub dirs_created: u64,
    /// Files copied onto the replica.
    pub files_copied: u64,
    /// Replica-only files removed.
    pub files_removed: u64,
    /// Replica-only directories removed.
    pub dirs_removed: u64,
    /// Per-entry failures isolated during the pass.
    pub errors: u64,
}

impl PassStats {
    /// Total number of mutations applied to the replica.
    #[must_use]
    pub fn changes(&self) -> u64 {
        self.dirs_created + self.files_copied + self.files_removed + self.dirs_removed
    }

    /// Whether the pass changed nothing and hit no errors.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes() == 0 && self.errors == 0
    }

    fn count(&mut self, action: SyncAction) {
        match action {
            SyncAction::DirCreated => self.dirs_created += 1,
            SyncAction::FileCopied => self.files_copied += 1,
            SyncAction::FileRemoved => self.files_removed += 1,
            SyncAction::DirRemoved => self.dirs_removed += 1,
            SyncAction::Error => self.errors += 1,
        }
    }
}

/// One-way directory mirroring engine.
///
/// Owns nothing but its configuration; `sync` may be called any number of
/// times, against any tree pair, and each call is a complete pass.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    config: MirrorConfig,
}

impl Mirror {
    /// Create a mirror with default configuration.
    #[must_use]
    pub fn new() -> Self {
        MirrorBuilder::new().build()
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Run one synchronization pass, forwarding every event to `sink`.
    ///
    /// After the pass the replica's directories and file contents match
    /// the source's, minus any entries whose individual operations failed
    /// (reported as error events and retried by nature on the next pass).
    pub fn sync(
        &self,
        source_root: &Path,
        replica_root: &Path,
        sink: &mut dyn EventSink,
    ) -> PassStats {
        let mut stats = PassStats::default();
        self.create_phase(source_root, replica_root, sink, &mut stats);
        self.remove_files_phase(source_root, replica_root, sink, &mut stats);
        self.remove_dirs_phase(source_root, replica_root, sink, &mut stats);
        stats
    }

    /// Run one pass and return the emitted events in emission order.
    #[must_use]
    pub fn sync_collect(&self, source_root: &Path, replica_root: &Path) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        self.sync(source_root, replica_root, &mut events);
        events
    }

    /// Walk the source tree, creating replica directories and copying
    /// stale files.
    fn create_phase(
        &self,
        source_root: &Path,
        replica_root: &Path,
        sink: &mut dyn EventSink,
        stats: &mut PassStats,
    ) {
        for item in TreeWalk::new(source_root) {
            let listing = match item {
                Ok(listing) => listing,
                Err(e) => {
                    emit(sink, stats, SyncEvent::failure(&e));
                    continue;
                }
            };
            let dst_dir = match map_path(&listing.path, source_root, replica_root) {
                Ok(path) => path,
                Err(e) => {
                    emit(sink, stats, SyncEvent::failure(&e));
                    continue;
                }
            };

            if !dst_dir.is_dir() {
                if let Err(e) = self.create_dir(&listing.path, &dst_dir) {
                    // No point copying files into a directory that could
                    // not be created; siblings are unaffected.
                    emit(sink, stats, SyncEvent::failure(&e));
                    continue;
                }
                emit(sink, stats, SyncEvent::new(SyncAction::DirCreated, &dst_dir));
            }

            for name in &listing.files {
                let src_file = listing.path.join(name);
                if self.config.skip_symlinks && !is_regular_file(&src_file) {
                    continue;
                }
                let dst_file = dst_dir.join(name);
                match self.copy_if_stale(&src_file, &dst_file) {
                    Ok(true) => {
                        emit(sink, stats, SyncEvent::new(SyncAction::FileCopied, &dst_file));
                    }
                    Ok(false) => {}
                    Err(e) => emit(sink, stats, SyncEvent::failure(&e)),
                }
            }
        }
    }

    /// Walk the replica tree, removing files with no source counterpart.
    fn remove_files_phase(
        &self,
        source_root: &Path,
        replica_root: &Path,
        sink: &mut dyn EventSink,
        stats: &mut PassStats,
    ) {
        for item in TreeWalk::new(replica_root) {
            let listing = match item {
                Ok(listing) => listing,
                Err(e) => {
                    emit(sink, stats, SyncEvent::failure(&e));
                    continue;
                }
            };
            let src_dir = match map_path(&listing.path, replica_root, source_root) {
                Ok(path) => path,
                Err(e) => {
                    emit(sink, stats, SyncEvent::failure(&e));
                    continue;
                }
            };

            for name in &listing.files {
                if src_dir.join(name).exists() {
                    continue;
                }
                let rep_file = listing.path.join(name);
                match fs::remove_file(&rep_file) {
                    Ok(()) => {
                        emit(sink, stats, SyncEvent::new(SyncAction::FileRemoved, &rep_file));
                    }
                    Err(source) => {
                        let e = SpecchioError::FileRemove {
                            path: rep_file,
                            source,
                        };
                        emit(sink, stats, SyncEvent::failure(&e));
                    }
                }
            }
        }
    }

    /// Walk the replica tree deepest-first, removing directories with no
    /// source counterpart. Runs strictly after file removal, so every
    /// candidate directory is already empty unless something else failed.
    fn remove_dirs_phase(
        &self,
        source_root: &Path,
        replica_root: &Path,
        sink: &mut dyn EventSink,
        stats: &mut PassStats,
    ) {
        let mut listings = Vec::new();
        for item in TreeWalk::new(replica_root) {
            match item {
                Ok(listing) => listings.push(listing),
                Err(e) => emit(sink, stats, SyncEvent::failure(&e)),
            }
        }

        // Pre-order reversed puts every directory after all of its
        // descendants.
        for listing in listings.iter().rev() {
            let src_dir = match map_path(&listing.path, replica_root, source_root) {
                Ok(path) => path,
                Err(e) => {
                    emit(sink, stats, SyncEvent::failure(&e));
                    continue;
                }
            };
            if src_dir.exists() {
                continue;
            }
            match fs::remove_dir(&listing.path) {
                Ok(()) => {
                    emit(
                        sink,
                        stats,
                        SyncEvent::new(SyncAction::DirRemoved, &listing.path),
                    );
                }
                Err(source) => {
                    // Not retried within the pass; the next pass will see
                    // the directory again once the obstruction clears.
                    let e = SpecchioError::DirectoryRemove {
                        path: listing.path.clone(),
                        source,
                    };
                    emit(sink, stats, SyncEvent::failure(&e));
                }
            }
        }
    }

    /// Create a replica directory (with any missing ancestors) and
    /// propagate the source directory's permissions and mtime onto it.
    fn create_dir(&self, src: &Path, dst: &Path) -> Result<()> {
        let wrap = |source| SpecchioError::DirectoryCreate {
            path: dst.to_path_buf(),
            source,
        };
        fs::create_dir_all(dst).map_err(wrap)?;
        let meta = fs::metadata(src).map_err(wrap)?;
        fs::set_permissions(dst, meta.permissions()).map_err(wrap)?;
        if self.config.preserve_times {
            let mtime = FileTime::from_last_modification_time(&meta);
            filetime::set_file_mtime(dst, mtime).map_err(wrap)?;
        }
        Ok(())
    }

    /// Copy `src` over `dst` if the needs-update decision marks it stale.
    /// Returns whether a copy happened.
    fn copy_if_stale(&self, src: &Path, dst: &Path) -> Result<bool> {
        if !compare::compare(src, dst)?.needs_copy() {
            return Ok(false);
        }
        let wrap = |source| SpecchioError::FileCopy {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        };
        fs::copy(src, dst).map_err(wrap)?;
        if self.config.preserve_times {
            let meta = fs::metadata(src).map_err(wrap)?;
            filetime::set_file_mtime(dst, FileTime::from_last_modification_time(&meta))
                .map_err(wrap)?;
        }
        Ok(true)
    }
}

fn emit(sink: &mut dyn EventSink, stats: &mut PassStats, event: SyncEvent) {
    stats.count(event.action);
    sink.record(event);
}

/// Re-root `path` from `from_root` onto `to_root`.
///
/// This is an explicit strip-and-rejoin rather than a string replacement,
/// so a root path recurring deeper inside `path` cannot be substituted by
/// accident.
fn map_path(path: &Path, from_root: &Path, to_root: &Path) -> Result<PathBuf> {
    let rel = path
        .strip_prefix(from_root)
        .map_err(|_| SpecchioError::PathResolution {
            path: path.to_path_buf(),
        })?;
    Ok(to_root.join(rel))
}

/// Whether `path` is a regular file, without following symlinks.
fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_file())
}
