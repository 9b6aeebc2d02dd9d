// RSA Digital Signatures
// s = H(m)^d mod n, verified by comparing s^e mod n with H(m)

use num_traits::Zero;
use rand::Rng;
use tracing::debug;

use super::bigint::{from_hex, mod_pow, to_hex, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::{generate_keypair_with_rng, KeySize, RsaPrivateKey, RsaPublicKey};
use crate::util::config::RsaConfig;
use crate::util::digest::MessageDigest;

/// Outcome of checking a signature, before collapsing to a boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The signature parsed; the flag says whether it matched the digest
    Verified(bool),
    /// The signature, digest or modulus could not be used
    MalformedSignature,
}

impl VerifyOutcome {
    pub fn is_valid(self) -> bool {
        matches!(self, VerifyOutcome::Verified(true))
    }
}

fn digest_int<D: MessageDigest + ?Sized>(message: &str, digest: &D) -> RsaResult<RsaBigInt> {
    let h = digest.digest(message)?;
    from_hex(&h).ok_or_else(|| RsaError::Signature("Digest is not a hex string".to_string()))
}

/// Sign a message, returning the signature as lowercase unpadded hex
pub fn sign<D: MessageDigest + ?Sized>(
    message: &str,
    private_key: &RsaPrivateKey,
    digest: &D,
) -> RsaResult<String> {
    if message.is_empty() {
        return Err(RsaError::InvalidInput("Message must not be empty".to_string()));
    }

    let h_int = digest_int(message, digest)?;

    if h_int >= private_key.n {
        return Err(RsaError::Signature(
            "Digest is too large for the key".to_string(),
        ));
    }

    let s = mod_pow(&h_int, &private_key.d, &private_key.n);
    debug!(n_bits = private_key.bit_length(), "message signed");
    Ok(to_hex(&s))
}

/// Check a signature, keeping malformed input distinct from a mismatch
pub fn verify_detailed<D: MessageDigest + ?Sized>(
    message: &str,
    signature: &str,
    public_key: &RsaPublicKey,
    digest: &D,
) -> VerifyOutcome {
    if public_key.n.is_zero() {
        return VerifyOutcome::MalformedSignature;
    }
    let Some(s) = from_hex(signature) else {
        return VerifyOutcome::MalformedSignature;
    };
    let Ok(h_int) = digest_int(message, digest) else {
        return VerifyOutcome::MalformedSignature;
    };

    let recovered = mod_pow(&s, &public_key.e, &public_key.n);
    // Compare minimal hex renderings so a leading zero nibble in the digest still matches
    VerifyOutcome::Verified(to_hex(&recovered) == to_hex(&h_int))
}

/// Verify a signature
///
/// Empty message or signature is an input error. Anything else that goes
/// wrong, including a signature that is not hex, is reported as `Ok(false)`.
pub fn verify<D: MessageDigest + ?Sized>(
    message: &str,
    signature: &str,
    public_key: &RsaPublicKey,
    digest: &D,
) -> RsaResult<bool> {
    if message.is_empty() || signature.trim().is_empty() {
        return Err(RsaError::InvalidInput(
            "Message and signature must not be empty".to_string(),
        ));
    }

    let outcome = verify_detailed(message, signature, public_key, digest);
    debug!(?outcome, "signature checked");
    Ok(outcome.is_valid())
}

/// Everything produced by a full sign-then-verify walkthrough
#[derive(Debug, Clone)]
pub struct SignatureDemo {
    pub message: String,
    pub message_hash: String,
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub signature: String,
    pub verification: bool,
    pub process_steps: [&'static str; 4],
}

const DEMO_STEPS: [&str; 4] = [
    "1. Hash the message",
    "2. Raise the digest to the private exponent (sign)",
    "3. Raise the signature to the public exponent",
    "4. Compare the recovered digest with the message digest",
];

/// Generate a fresh key pair, sign `message` and verify it
pub fn sign_and_verify_demo<D: MessageDigest + ?Sized, R: Rng + ?Sized>(
    message: &str,
    key_size: KeySize,
    config: &RsaConfig,
    digest: &D,
    rng: &mut R,
) -> RsaResult<SignatureDemo> {
    let keypair = generate_keypair_with_rng(key_size, config, rng)?;
    let signature = sign(message, &keypair.private_key, digest)?;
    let verification = verify(message, &signature, &keypair.public_key, digest)?;

    Ok(SignatureDemo {
        message: message.to_string(),
        message_hash: digest.digest(message)?,
        public_key: keypair.public_key,
        private_key: keypair.private_key,
        signature,
        verification,
        process_steps: DEMO_STEPS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::keygen::RsaKeyPair;
    use crate::util::digest::Sha256Digest;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> RsaKeyPair {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_keypair_with_rng(KeySize::Bits512, &RsaConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_sign_verify() {
        let keypair = seeded(21);
        let signature = sign("A", &keypair.private_key, &Sha256Digest).unwrap();

        assert_eq!(signature, signature.to_lowercase());
        assert!(!signature.starts_with("0x"));
        assert!(verify("A", &signature, &keypair.public_key, &Sha256Digest).unwrap());
        assert!(!verify("B", &signature, &keypair.public_key, &Sha256Digest).unwrap());
    }

    #[test]
    fn test_cross_key_rejection() {
        let a = seeded(22);
        let b = seeded(23);
        let signature = sign("shared message", &a.private_key, &Sha256Digest).unwrap();
        assert!(!verify("shared message", &signature, &b.public_key, &Sha256Digest).unwrap());
    }

    #[test]
    fn test_malformed_signature() {
        let keypair = seeded(24);
        let outcome = verify_detailed("A", "not-hex", &keypair.public_key, &Sha256Digest);
        assert_eq!(outcome, VerifyOutcome::MalformedSignature);
        assert!(!verify("A", "not-hex", &keypair.public_key, &Sha256Digest).unwrap());
    }

    #[test]
    fn test_empty_inputs() {
        let keypair = seeded(25);
        assert!(matches!(
            sign("", &keypair.private_key, &Sha256Digest),
            Err(RsaError::InvalidInput(_))
        ));
        assert!(matches!(
            verify("A", "", &keypair.public_key, &Sha256Digest),
            Err(RsaError::InvalidInput(_))
        ));
        assert!(matches!(
            verify("", "ff", &keypair.public_key, &Sha256Digest),
            Err(RsaError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_digest_too_large_for_key() {
        // SHA-256 needs more than the 12 bits of n = 3233
        let key = RsaPrivateKey { d: from_u64(2753), n: from_u64(3233) };
        let result = sign("A", &key, &Sha256Digest);
        assert!(matches!(result, Err(RsaError::Signature(_))));
    }

    #[test]
    fn test_leading_zero_digest_verifies() {
        let keypair = seeded(26);
        let padded = |_: &str| "000000ab".to_string();
        let signature = sign("anything", &keypair.private_key, &padded).unwrap();
        assert!(verify("anything", &signature, &keypair.public_key, &padded).unwrap());
    }

    #[test]
    fn test_non_hex_digest() {
        let keypair = seeded(27);
        let broken = |_: &str| "xyz".to_string();
        assert!(matches!(
            sign("A", &keypair.private_key, &broken),
            Err(RsaError::Signature(_))
        ));
        assert!(!verify("A", "ff", &keypair.public_key, &broken).unwrap());
    }

    #[test]
    fn test_zero_modulus_is_malformed() {
        let key = RsaPublicKey { e: from_u64(65537), n: from_u64(0) };
        let outcome = verify_detailed("A", "ff", &key, &Sha256Digest);
        assert_eq!(outcome, VerifyOutcome::MalformedSignature);
        assert!(!verify("A", "ff", &key, &Sha256Digest).unwrap());
    }

    struct RefusingDigest;

    impl MessageDigest for RefusingDigest {
        fn digest(&self, _message: &str) -> RsaResult<String> {
            Err(RsaError::InvalidInput("digest unavailable".to_string()))
        }
    }

    #[test]
    fn test_failing_digest() {
        let keypair = seeded(29);
        assert!(matches!(
            sign("A", &keypair.private_key, &RefusingDigest),
            Err(RsaError::InvalidInput(_))
        ));
        assert_eq!(
            verify_detailed("A", "ff", &keypair.public_key, &RefusingDigest),
            VerifyOutcome::MalformedSignature
        );
        assert!(!verify("A", "ff", &keypair.public_key, &RefusingDigest).unwrap());
    }

    #[test]
    fn test_demo() {
        let mut rng = StdRng::seed_from_u64(28);
        let demo = sign_and_verify_demo(
            "demo message",
            KeySize::Bits512,
            &RsaConfig::default(),
            &Sha256Digest,
            &mut rng,
        )
        .unwrap();
        assert!(demo.verification);
        assert_eq!(demo.message_hash.len(), 64);
        assert_eq!(demo.public_key.n, demo.private_key.n);
    }
}
