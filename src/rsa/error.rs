// RSA Error Types
// One variant per failure kind of the asymmetric core

use thiserror::Error;

/// Errors raised by key generation, encryption, decryption and signing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    /// Empty message, empty ciphertext, empty signature or an unusable parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No key is available, or a key pair could not be produced
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// A plaintext block does not fit under the modulus
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Malformed ciphertext or recovered bytes that are not UTF-8
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// The digest integer does not fit under the modulus
    #[error("Signature error: {0}")]
    Signature(String),

    /// Modular inverse requested for non-coprime arguments
    #[error("Modular inverse does not exist")]
    NoInverse,
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
