// crates/quality-gate-core/src/core/hashing.rs
// ============================================================================
// Module: Quality Gate Content Hashing
// Description: Streaming SHA-256 digests over file contents.
// Purpose: Provide deterministic content fingerprints for index verification.
// Dependencies: serde, sha2, thiserror
// ============================================================================

//! ## Overview
//! Files are hashed in fixed-size chunks so memory use does not depend on the
//! file size. Digests are rendered as lowercase hex; comparisons against
//! recorded digests ignore letter case.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Chunk size used when streaming file contents into the hasher.
pub const HASH_CHUNK_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported hash algorithms for index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing.
    Sha256,
}

/// Default hash algorithm for file indexes.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// Computed content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDigest {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl HashDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex_encode(bytes),
        }
    }

    /// Returns true when `recorded` names the same digest, ignoring case.
    #[must_use]
    pub fn matches(&self, recorded: &str) -> bool {
        digests_match(&self.value, recorded)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when hashing file contents.
#[derive(Debug, Error)]
pub enum HashError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Hashes raw bytes using the provided algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(bytes);
            let digest = hasher.finalize();
            HashDigest::new(HashAlgorithm::Sha256, &digest)
        }
    }
}

/// Hashes everything readable from `reader` in bounded chunks.
///
/// # Errors
///
/// Returns the underlying [`io::Error`] when a read fails.
pub fn hash_reader<R: Read>(algorithm: HashAlgorithm, reader: &mut R) -> io::Result<HashDigest> {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            let mut buffer = vec![0u8; HASH_CHUNK_BYTES];
            loop {
                let read = match reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(read) => read,
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err),
                };
                hasher.update(&buffer[.. read]);
            }
            let digest = hasher.finalize();
            Ok(HashDigest::new(HashAlgorithm::Sha256, &digest))
        }
    }
}

/// Hashes the full contents of the file at `path`.
///
/// The handle is released before this function returns.
///
/// # Errors
///
/// Returns [`HashError::Read`] when the file cannot be opened or read.
pub fn hash_file(algorithm: HashAlgorithm, path: &Path) -> Result<HashDigest, HashError> {
    let read_error = |source| HashError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_error)?;
    hash_reader(algorithm, &mut file).map_err(read_error)
}

/// Compares two hex digests without regard to letter case.
#[must_use]
pub fn digests_match(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
