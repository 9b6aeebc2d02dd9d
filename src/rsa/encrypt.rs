// RSA Encryption Implementation
// Block-wise textbook RSA: c_i = m_i^e mod n

use tracing::debug;

use super::bigint::{mod_pow, to_hex, RsaBigInt};
use super::blocks::split;
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPublicKey;

/// Ordered encrypted blocks, one per plaintext block
pub type Ciphertext = Vec<RsaBigInt>;

/// Encrypt a UTF-8 message with the public key
pub fn encrypt_string(message: &str, public_key: &RsaPublicKey) -> RsaResult<Ciphertext> {
    if message.is_empty() {
        return Err(RsaError::InvalidInput("Message must not be empty".to_string()));
    }

    let blocks = split(message.as_bytes(), &public_key.n)?;
    debug!(blocks = blocks.len(), bytes = message.len(), "encrypting");

    Ok(blocks
        .iter()
        .map(|m| mod_pow(m, &public_key.e, &public_key.n))
        .collect())
}

/// Render ciphertext as comma-separated lowercase hex blocks
pub fn format_ciphertext(ciphertext: &[RsaBigInt]) -> String {
    ciphertext.iter().map(to_hex).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::keygen::{generate_keypair_with_rng, KeySize};
    use crate::util::config::RsaConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_public_key() -> RsaPublicKey {
        let mut rng = StdRng::seed_from_u64(1);
        generate_keypair_with_rng(KeySize::Bits512, &RsaConfig::default(), &mut rng)
            .unwrap()
            .public_key
    }

    #[test]
    fn test_encrypt_string() {
        let key = test_public_key();
        let ciphertext = encrypt_string("HELLO WORLD", &key).unwrap();

        assert_eq!(ciphertext.len(), 1);
        assert!(ciphertext.iter().all(|c| c < &key.n));
    }

    #[test]
    fn test_encrypt_preserves_block_count() {
        let key = test_public_key();
        // 63 bytes per block for a 511/512-bit modulus, 62 for smaller
        let message = "x".repeat(200);
        let ciphertext = encrypt_string(&message, &key).unwrap();
        let per_block = super::super::blocks::block_size(&key.n);
        assert_eq!(ciphertext.len(), 200usize.div_ceil(per_block));
    }

    #[test]
    fn test_encrypt_empty() {
        let key = test_public_key();
        let result = encrypt_string("", &key);
        assert!(matches!(result, Err(RsaError::InvalidInput(_))));
    }

    #[test]
    fn test_textbook_vector() {
        // p = 61, q = 53, n = 3233, e = 17: 'A' (65) -> 2790
        let key = RsaPublicKey { e: from_u64(17), n: from_u64(3233) };
        assert_eq!(encrypt_string("A", &key).unwrap(), vec![from_u64(2790)]);
    }

    #[test]
    fn test_format_ciphertext() {
        let text = format_ciphertext(&[from_u64(255), from_u64(16)]);
        assert_eq!(text, "ff,10");
    }
}
