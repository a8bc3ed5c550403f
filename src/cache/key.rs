// Fingerprint keys and their sharded storage layout

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension shared by the disk and S3 layouts
pub const ARTIFACT_EXTENSION: &str = "bin";

/// Opaque 64-bit identifier of one rendered artifact
///
/// Computed upstream from the transform parameters and treated as an
/// immutable key by every cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Derive a fingerprint from arbitrary bytes
    ///
    /// Uses the first 8 bytes (big-endian) of the SHA256 digest.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(head))
    }

    /// Lowercase, zero-padded 16 hex digit representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_be_bytes())
    }

    /// Shard segment: the first 2 hex digits (256-way fan-out)
    pub fn shard(&self) -> String {
        format!("{:02x}", self.0 >> 56)
    }

    /// Artifact file name: `<hex16>.bin`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.to_hex(), ARTIFACT_EXTENSION)
    }

    /// Durable path under a local cache root: `<root>/<shard>/<hex16>.bin`
    pub fn disk_path(&self, cache_root: &Path) -> PathBuf {
        cache_root.join(self.shard()).join(self.file_name())
    }

    /// Remote object key: `<prefix><shard>/<hex16>.bin`
    pub fn object_key(&self, prefix: &str) -> String {
        format!("{}{}/{}", prefix, self.shard(), self.file_name())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
