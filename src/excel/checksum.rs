use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::types::HashUnavailable;

/// Produces the content-addressing key of an uploaded file
pub trait ContentHasher: Send + Sync {
    /// Lowercase hexadecimal digest of `bytes`, no separators
    fn digest_hex(&self, bytes: &[u8]) -> Result<String, HashUnavailable>;
}

/// SHA-256, rendered as 64 lowercase hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn digest_hex(&self, bytes: &[u8]) -> Result<String, HashUnavailable> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);

        let result = hasher.finalize();
        Ok(format!("{:x}", result))
    }
}

/// Stands in when hashing is switched off; always reports unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledHasher;

impl ContentHasher for DisabledHasher {
    fn digest_hex(&self, _bytes: &[u8]) -> Result<String, HashUnavailable> {
        Err(HashUnavailable::new("content hashing is disabled"))
    }
}

/// Hash `bytes`, degrading to an empty string when the hasher is unavailable
pub fn fingerprint(hasher: &dyn ContentHasher, bytes: &[u8]) -> String {
    match hasher.digest_hex(bytes) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "Returning empty hash");
            String::new()
        }
    }
}

/// [`fingerprint`] on a blocking worker so large buffers don't stall the runtime
pub async fn fingerprint_async(hasher: Arc<dyn ContentHasher>, buffer: Arc<[u8]>) -> String {
    let task = tokio::task::spawn_blocking(move || fingerprint(hasher.as_ref(), &buffer));

    match task.await {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "Hash task failed, returning empty hash");
            String::new()
        }
    }
}
