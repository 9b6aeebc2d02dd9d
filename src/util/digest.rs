// Message Digest Collaborator
// Supplies the fixed-length hex fingerprint that signatures are built on

use sha2::{Digest, Sha256};

use crate::rsa::error::{RsaError, RsaResult};

/// Deterministic, fixed-length hexadecimal digest of a message
///
/// Any `Fn(&str) -> String` closure is also a digest, which keeps tests free
/// to plug in toy fingerprints.
pub trait MessageDigest {
    fn digest(&self, message: &str) -> RsaResult<String>;
}

impl<F> MessageDigest for F
where
    F: Fn(&str) -> String,
{
    fn digest(&self, message: &str) -> RsaResult<String> {
        Ok(self(message))
    }
}

/// SHA-256 over the UTF-8 bytes, rendered as 64 lowercase hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl MessageDigest for Sha256Digest {
    fn digest(&self, message: &str) -> RsaResult<String> {
        if message.is_empty() {
            return Err(RsaError::InvalidInput("Data to hash must not be empty".to_string()));
        }
        let mut hasher = Sha256::new();
        hasher.update(message.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}
