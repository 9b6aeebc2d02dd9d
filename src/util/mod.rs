// Utility Module
// Configuration and the digest collaborator

pub mod config;
pub mod digest;

pub use config::RsaConfig;
pub use digest::{MessageDigest, Sha256Digest};
