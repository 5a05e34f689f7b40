//! Credential digest
//!
//! SHA-256 of the transformed password, rendered as lowercase hex.

use sha2::{Digest, Sha256};

/// Hashes a transformed password into the stored credential (64 hex chars).
pub fn digest(transformed: &str) -> String {
    hex::encode(Sha256::digest(transformed.as_bytes()))
}
