use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// A 20-byte chunk identity computed as SHA-1 of the chunk contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkHash(pub [u8; 20]);

impl ChunkHash {
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha1::digest(data);
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest);
        ChunkHash(out)
    }

    /// Lowercase hex of the digest read as an unsigned big-endian number.
    ///
    /// Leading zero digits are omitted, so the result can be shorter than 40
    /// characters. An all-zero digest renders as `"0"`.
    pub fn to_hex(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl fmt::Debug for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkHash({})", &hex::encode(self.0)[..16])
    }
}

impl fmt::Display for ChunkHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
