//! Streaming content digests using BLAKE3.
//!
//! The digest is the authoritative fallback of the needs-update decision:
//! it only runs once the cheap size and mtime checks have failed to prove
//! a file stale. Files are hashed in fixed-size chunks so memory use stays
//! constant regardless of file size.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, SpecchioError};

/// Chunk size for streaming reads. Not correctness-relevant.
const CHUNK_SIZE: usize = 8192;

/// Content digest of a file, used to settle same-size comparisons.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Compute the digest of an in-memory buffer.
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Compute the digest of a reader in fixed-size chunks.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading fails.
    pub fn from_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = [0u8; CHUNK_SIZE];

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(Self(*hasher.finalize().as_bytes()))
    }

    /// Compute the digest of a file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SpecchioError::DigestCompute`] if the file cannot be
    /// opened or read.
    pub fn of_file(path: &Path) -> Result<Self> {
        let wrap = |source| SpecchioError::DigestCompute {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(wrap)?;
        Self::from_reader(&mut file).map_err(wrap)
    }

    /// Get the raw bytes of the digest.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentDigest({})", blake3::Hash::from(self.0).to_hex())
    }
}
