//! Checksums of migration SQL, recorded when a migration is applied

use sha2::{Digest, Sha256};

/// Compute the SHA256 checksum of a string, hex encoded
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
