use sha2::{Digest, Sha256};

/// SHA-256 of the raw byte stream, hex-encoded. Computed before any
/// format-specific parsing so a parse failure still yields a stable,
/// content-addressable identity for the file.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
