use sha2::{Digest, Sha256};

/// SHA-256 digest of a URL's text
///
/// The digest is stable across processes and platforms, which is what makes
/// shard routing repeatable between cooperating crawlers.
pub fn url_digest(url: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.finalize().into()
}

/// Hex-encoded SHA-256 of a URL, used as a compact cache key
pub fn url_key(url: &str) -> String {
    hex::encode(url_digest(url))
}
