//! Educational RSA toolkit.
//!
//! Miller-Rabin primality testing, RSA key generation, block-oriented
//! encryption of UTF-8 text and hash-then-sign signatures, all on
//! arbitrary-precision integers.
//!
//! This is a teaching implementation: the randomness is a general-purpose
//! PRNG, there is no padding scheme and nothing runs in constant time.
//! Primality is probabilistic; a composite slips through a test with
//! probability at most 4^-rounds.

pub mod rsa;
pub mod ui;
pub mod util;

pub use rsa::{RsaError, RsaResult};
pub use util::{MessageDigest, RsaConfig, Sha256Digest};
