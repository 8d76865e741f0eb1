// crates/campus-gate-credentials/src/fingerprint.rs
// ============================================================================
// Module: Campus Gate Credential Fingerprints
// Description: One-way fingerprints for revocation and audit labeling.
// Purpose: Keep raw credentials out of every store and log.
// Dependencies: sha2
// ============================================================================

//! ## Overview
//! The revocation set and audit events reference credentials only by a
//! one-way SHA-256 fingerprint, lowercase hex encoded. Raw credential strings
//! never leave the request path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Fingerprinting
// ============================================================================

/// Returns the lowercase-hex SHA-256 fingerprint of a credential.
#[must_use]
pub fn fingerprint(credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential.as_bytes());
    hex_encode(&hasher.finalize())
}

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
