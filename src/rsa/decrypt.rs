// RSA Decryption Implementation
// Block-wise textbook RSA: m_i = c_i^d mod n, then reassemble the text

use tracing::debug;

use super::bigint::{from_hex, mod_pow, RsaBigInt};
use super::blocks::join;
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPrivateKey;

/// Decrypt ordered ciphertext blocks back to the original message
pub fn decrypt_to_string(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> RsaResult<String> {
    if ciphertext.is_empty() {
        return Err(RsaError::InvalidInput("No blocks to decrypt".to_string()));
    }

    let n = &private_key.n;
    if let Some(pos) = ciphertext.iter().position(|c| c >= n) {
        return Err(RsaError::Decryption(format!(
            "Block {} is not smaller than the modulus",
            pos
        )));
    }

    debug!(blocks = ciphertext.len(), "decrypting");
    let blocks: Vec<RsaBigInt> = ciphertext
        .iter()
        .map(|c| mod_pow(c, &private_key.d, n))
        .collect();

    join(&blocks)
}

/// Parse comma-separated hex blocks produced by `format_ciphertext`
pub fn parse_ciphertext(text: &str) -> RsaResult<Vec<RsaBigInt>> {
    if text.trim().is_empty() {
        return Err(RsaError::InvalidInput("No blocks to decrypt".to_string()));
    }

    text.split(',')
        .enumerate()
        .map(|(i, part)| {
            from_hex(part).ok_or_else(|| {
                RsaError::Decryption(format!("Block {} is not a hex integer: {:?}", i, part.trim()))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::encrypt::{encrypt_string, format_ciphertext};
    use crate::rsa::keygen::{generate_keypair_with_rng, KeySize, RsaKeyPair};
    use crate::util::config::RsaConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> RsaKeyPair {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_keypair_with_rng(KeySize::Bits512, &RsaConfig::default(), &mut rng).unwrap()
    }

    fn test_roundtrip(keypair: &RsaKeyPair, message: &str) {
        let ciphertext = encrypt_string(message, &keypair.public_key).unwrap();
        let decrypted = decrypt_to_string(&ciphertext, &keypair.private_key).unwrap();
        assert_eq!(message, decrypted);
    }

    #[test]
    fn test_decrypt_hello_world() {
        let keypair = seeded(11);
        test_roundtrip(&keypair, "HELLO WORLD");
    }

    #[test]
    fn test_roundtrip_various_sizes() {
        let keypair = seeded(12);
        let long = "Lorem ipsum dolor sit amet. ".repeat(20);
        for message in ["A", "AB", "Hello", "Hello, World!", "año ñandú €", "🦀🦀🦀", long.as_str()] {
            test_roundtrip(&keypair, message);
        }
    }

    #[test]
    fn test_textbook_vector() {
        // d = 2753 for p = 61, q = 53, e = 17
        let key = RsaPrivateKey { d: from_u64(2753), n: from_u64(3233) };
        assert_eq!(decrypt_to_string(&[from_u64(2790)], &key).unwrap(), "A");
    }

    #[test]
    fn test_decrypt_empty() {
        let keypair = seeded(13);
        let result = decrypt_to_string(&[], &keypair.private_key);
        assert!(matches!(result, Err(RsaError::InvalidInput(_))));
    }

    #[test]
    fn test_decrypt_block_out_of_range() {
        let keypair = seeded(14);
        let too_big = &keypair.private_key.n + 1u8;
        let result = decrypt_to_string(&[too_big], &keypair.private_key);
        assert!(matches!(result, Err(RsaError::Decryption(_))));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let keypair1 = seeded(15);
        let keypair2 = seeded(16);

        let message = "Test message encrypted for another key";
        let ciphertext = encrypt_string(message, &keypair1.public_key).unwrap();

        // Either the bytes are garbage UTF-8, a block exceeds the other modulus,
        // or (vanishingly unlikely) valid but different text
        match decrypt_to_string(&ciphertext, &keypair2.private_key) {
            Ok(text) => assert_ne!(text, message),
            Err(e) => assert!(matches!(e, RsaError::Decryption(_))),
        }
    }

    #[test]
    fn test_parse_ciphertext() {
        let keypair = seeded(17);
        let ciphertext = encrypt_string("parse me", &keypair.public_key).unwrap();
        let text = format_ciphertext(&ciphertext);
        assert_eq!(parse_ciphertext(&text).unwrap(), ciphertext);

        assert!(matches!(parse_ciphertext("ff,zz"), Err(RsaError::Decryption(_))));
        assert!(matches!(parse_ciphertext("ff,,10"), Err(RsaError::Decryption(_))));
        assert!(matches!(parse_ciphertext("  "), Err(RsaError::InvalidInput(_))));
    }
}
