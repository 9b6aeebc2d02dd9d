// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod blocks;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod signature;

pub use bigint::{extended_gcd, gcd, is_probable_prime, mod_inverse, mod_pow, RsaBigInt};
pub use decrypt::{decrypt_to_string, parse_ciphertext};
pub use encrypt::{encrypt_string, format_ciphertext, Ciphertext};
pub use error::{RsaError, RsaResult};
pub use keygen::{
    generate_keypair, generate_keypair_with_rng, require_key, KeyInfo, KeySize, RsaKeyPair,
    RsaPrivateKey, RsaPublicKey,
};
pub use signature::{sign, sign_and_verify_demo, verify, verify_detailed, SignatureDemo, VerifyOutcome};
