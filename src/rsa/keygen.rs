// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use num_traits::One;
use rand::{thread_rng, Rng};
use tracing::{debug, info};

use super::bigint::{bit_length, from_hex, from_u64, gcd, mod_inverse, random_prime_with_rng, to_hex, RsaBigInt};
use super::error::{RsaError, RsaResult};
use crate::util::config::RsaConfig;

/// Supported modulus sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeySize {
    Bits512,
    #[default]
    Bits1024,
    Bits2048,
    Bits4096,
}

impl KeySize {
    pub const ALL: [KeySize; 4] = [
        KeySize::Bits512,
        KeySize::Bits1024,
        KeySize::Bits2048,
        KeySize::Bits4096,
    ];

    pub fn bits(self) -> u32 {
        match self {
            KeySize::Bits512 => 512,
            KeySize::Bits1024 => 1024,
            KeySize::Bits2048 => 2048,
            KeySize::Bits4096 => 4096,
        }
    }
}

impl TryFrom<u32> for KeySize {
    type Error = RsaError;

    fn try_from(bits: u32) -> RsaResult<Self> {
        KeySize::ALL
            .into_iter()
            .find(|size| size.bits() == bits)
            .ok_or_else(|| {
                RsaError::InvalidInput(format!(
                    "Unsupported key size {} (expected 512, 1024, 2048 or 4096)",
                    bits
                ))
            })
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub e: RsaBigInt, // Public exponent
    pub n: RsaBigInt, // Modulus
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub d: RsaBigInt, // Private exponent
    pub n: RsaBigInt, // Modulus (same as public)
}

fn parse_key_part(label: &str, hex: &str) -> RsaResult<RsaBigInt> {
    from_hex(hex).ok_or_else(|| RsaError::InvalidInput(format!("{} is not a hex integer", label)))
}

fn check_modulus(n: &RsaBigInt) -> RsaResult<()> {
    if n <= &RsaBigInt::one() {
        return Err(RsaError::InvalidInput("Modulus must be greater than 1".to_string()));
    }
    Ok(())
}

impl RsaPublicKey {
    /// Build a public key from hex exponent and modulus
    pub fn from_hex(e: &str, n: &str) -> RsaResult<Self> {
        let e = parse_key_part("Public exponent", e)?;
        let n = parse_key_part("Modulus", n)?;
        check_modulus(&n)?;
        Ok(Self { e, n })
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.n)
    }
}

impl RsaPrivateKey {
    /// Build a private key from hex exponent and modulus
    pub fn from_hex(d: &str, n: &str) -> RsaResult<Self> {
        let d = parse_key_part("Private exponent", d)?;
        let n = parse_key_part("Modulus", n)?;
        check_modulus(&n)?;
        Ok(Self { d, n })
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.n)
    }
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub key_size: KeySize,
    p: RsaBigInt,
    q: RsaBigInt,
}

/// Displayable summary of a key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub key_size: u32,
    pub n_bits: u64,
    pub n_hex: String,
    pub e_hex: String,
    pub d_hex: String,
}

impl fmt::Display for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "key size: {} bits (modulus {} bits)", self.key_size, self.n_bits)?;
        writeln!(f, "n: {}", self.n_hex)?;
        writeln!(f, "e: {}", self.e_hex)?;
        write!(f, "d: {}", self.d_hex)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }

    /// The two secret primes (p, q) with n = p * q
    pub fn factors(&self) -> (&RsaBigInt, &RsaBigInt) {
        (&self.p, &self.q)
    }

    /// φ(n) = (p-1)(q-1)
    pub fn totient(&self) -> RsaBigInt {
        (&self.p - 1u8) * (&self.q - 1u8)
    }

    pub fn info(&self) -> KeyInfo {
        KeyInfo {
            key_size: self.key_size.bits(),
            n_bits: self.bit_length(),
            n_hex: to_hex(&self.public_key.n),
            e_hex: to_hex(&self.public_key.e),
            d_hex: to_hex(&self.private_key.d),
        }
    }
}

/// Return the supplied key or fail as "no key available"
pub fn require_key<'a, K>(key: Option<&'a K>, role: &str) -> RsaResult<&'a K> {
    key.ok_or_else(|| RsaError::KeyGeneration(format!("No {} key available", role)))
}

/// Generate an RSA key pair with the default configuration
pub fn generate_keypair(key_size: KeySize) -> RsaResult<RsaKeyPair> {
    generate_keypair_with_rng(key_size, &RsaConfig::default(), &mut thread_rng())
}

/// Generate an RSA key pair drawing all randomness from `rng`
///
/// Primes p and q each have exactly `key_size / 2` bits. The public exponent
/// starts at `config.public_exponent` and steps by 2 until it is coprime with
/// φ(n), giving up after `config.max_exponent_attempts` candidates.
pub fn generate_keypair_with_rng<R: Rng + ?Sized>(
    key_size: KeySize,
    config: &RsaConfig,
    rng: &mut R,
) -> RsaResult<RsaKeyPair> {
    config.validate()?;

    let half_bits = u64::from(key_size.bits() / 2);
    let rounds = config.miller_rabin_rounds;
    debug!(bits = key_size.bits(), rounds, "generating key pair");

    // Step 1: Generate two distinct random primes p and q
    let p = random_prime_with_rng(half_bits, rounds, rng);
    let mut q = random_prime_with_rng(half_bits, rounds, rng);
    while q == p {
        debug!("p == q, resampling q");
        q = random_prime_with_rng(half_bits, rounds, rng);
    }

    // Step 2: n = p * q, φ(n) = (p-1)(q-1)
    let n = &p * &q;
    let phi_n = (&p - 1u8) * (&q - 1u8);

    // Step 3: Choose e coprime with φ(n)
    let e = select_public_exponent(&phi_n, config)?;

    // Step 4: d = e^(-1) mod φ(n)
    let d = mod_inverse(&e, &phi_n)?;

    info!(bits = key_size.bits(), n_bits = bit_length(&n), "key pair generated");

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { e, n: n.clone() },
        private_key: RsaPrivateKey { d, n },
        key_size,
        p,
        q,
    })
}

fn select_public_exponent(phi_n: &RsaBigInt, config: &RsaConfig) -> RsaResult<RsaBigInt> {
    let mut e = from_u64(config.public_exponent);
    for attempt in 0..config.max_exponent_attempts {
        if gcd(&e, phi_n).is_one() {
            if attempt > 0 {
                debug!(attempt, "public exponent moved off the default");
            }
            return Ok(e);
        }
        e += 2u8;
    }
    Err(RsaError::KeyGeneration(format!(
        "No public exponent coprime with φ(n) after {} attempts",
        config.max_exponent_attempts
    )))
}
