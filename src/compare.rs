//! The needs-update decision.
//!
//! Deciding whether a replica file must be rewritten runs the checks in
//! cost order: existence, then size, then modification time, and only as a
//! last resort a full content digest of both files. The cheap metadata
//! checks settle the common unchanged case without reading a byte of file
//! content; the digest settles everything the metadata cannot prove.

use std::fs;
use std::path::Path;

use crate::digest::ContentDigest;
use crate::error::{Result, SpecchioError};

/// Outcome of comparing a source file against its replica counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The replica file does not exist.
    Missing,
    /// Size or modification time proves the replica stale.
    StaleMetadata,
    /// Metadata matched but the content digests differ.
    StaleContent,
    /// The replica provably matches the source.
    UpToDate,
}

impl Verdict {
    /// Whether this verdict requires a copy.
    #[must_use]
    pub fn needs_copy(self) -> bool {
        self != Self::UpToDate
    }
}

/// Compare `source` against `dest`, cheapest check first.
///
/// The mtime check is one-sided on purpose: only a source strictly newer
/// than the destination short-circuits as stale. A destination with an
/// equal or newer timestamp still falls through to the digest, so a
/// replica file rewritten in place with a fresh timestamp is caught by
/// content rather than trusted by clock.
///
/// # Errors
///
/// Returns [`SpecchioError::Metadata`] if either file cannot be stat'ed
/// and [`SpecchioError::DigestCompute`] if hashing fails.
pub fn compare(source: &Path, dest: &Path) -> Result<Verdict> {
    if !dest.exists() {
        return Ok(Verdict::Missing);
    }

    let src_meta = stat(source)?;
    let dst_meta = stat(dest)?;

    if src_meta.len() != dst_meta.len() {
        return Ok(Verdict::StaleMetadata);
    }
    if let (Ok(src_mtime), Ok(dst_mtime)) = (src_meta.modified(), dst_meta.modified()) {
        if src_mtime > dst_mtime {
            return Ok(Verdict::StaleMetadata);
        }
    }

    if ContentDigest::of_file(source)? == ContentDigest::of_file(dest)? {
        Ok(Verdict::UpToDate)
    } else {
        Ok(Verdict::StaleContent)
    }
}

/// Shorthand for `compare(...)?.needs_copy()`.
///
/// # Errors
///
/// Propagates the errors of [`compare`].
pub fn needs_update(source: &Path, dest: &Path) -> Result<bool> {
    Ok(compare(source, dest)?.needs_copy())
}

fn stat(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(|source| SpecchioError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;
    use tempfile::TempDir;

    fn pair(src_content: &[u8], dst_content: Option<&[u8]>) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, src_content).unwrap();
        if let Some(content) = dst_content {
            fs::write(&dst, content).unwrap();
        }
        (dir, src, dst)
    }

    fn set_mtime(path: &Path, unix_secs: i64) {
        filetime::set_file_mtime(path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
    }

    #[test]
    fn missing_destination() {
        let (_dir, src, dst) = pair(b"content", None);
        assert_eq!(compare(&src, &dst).unwrap(), Verdict::Missing);
        assert!(needs_update(&src, &dst).unwrap());
    }

    #[test]
    fn size_mismatch_is_stale_metadata() {
        let (_dir, src, dst) = pair(b"longer content", Some(b"short"));
        assert_eq!(compare(&src, &dst).unwrap(), Verdict::StaleMetadata);
    }

    #[test]
    fn newer_source_is_stale_metadata() {
        let (_dir, src, dst) = pair(b"same!", Some(b"same!"));
        set_mtime(&dst, 1_000_000);
        set_mtime(&src, 2_000_000);
        assert_eq!(compare(&src, &dst).unwrap(), Verdict::StaleMetadata);
    }

    #[test]
    fn equal_metadata_different_content_is_stale_content() {
        // Same size, destination not older: only the digest can tell.
        let (_dir, src, dst) = pair(b"aaaa", Some(b"bbbb"));
        set_mtime(&src, 1_000_000);
        set_mtime(&dst, 1_000_000);
        assert_eq!(compare(&src, &dst).unwrap(), Verdict::StaleContent);
    }

    #[test]
    fn newer_destination_does_not_mask_divergence() {
        let (_dir, src, dst) = pair(b"aaaa", Some(b"bbbb"));
        set_mtime(&src, 1_000_000);
        set_mtime(&dst, 2_000_000);
        assert_eq!(compare(&src, &dst).unwrap(), Verdict::StaleContent);
    }

    #[test]
    fn identical_files_up_to_date() {
        let (_dir, src, dst) = pair(b"mirrored", Some(b"mirrored"));
        set_mtime(&src, 1_000_000);
        set_mtime(&dst, 1_000_000);
        let verdict = compare(&src, &dst).unwrap();
        assert_eq!(verdict, Verdict::UpToDate);
        assert!(!verdict.needs_copy());
    }

    #[test]
    fn identical_content_newer_destination_up_to_date() {
        let (_dir, src, dst) = pair(b"mirrored", Some(b"mirrored"));
        set_mtime(&src, 1_000_000);
        set_mtime(&dst, 2_000_000);
        assert_eq!(compare(&src, &dst).unwrap(), Verdict::UpToDate);
    }

    #[test]
    fn missing_source_is_metadata_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("absent");
        let dst = dir.path().join("dst");
        fs::write(&dst, b"x").unwrap();
        let err = compare(&src, &dst).unwrap_err();
        assert!(matches!(err, SpecchioError::Metadata { .. }));
    }
}
