// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::{thread_rng, Rng};

use super::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to its minimal big-endian bytes
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Number of significant bits (0 for zero)
pub fn bit_length(n: &RsaBigInt) -> u64 {
    n.bits()
}

/// Lowercase hex, no prefix, no padding
pub fn to_hex(n: &RsaBigInt) -> String {
    n.to_str_radix(16)
}

/// Parse a hex string without `0x` prefix
pub fn from_hex(s: &str) -> Option<RsaBigInt> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    RsaBigInt::parse_bytes(s.as_bytes(), 16)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Greatest common divisor (iterative Euclid)
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &q * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    // Both inputs are non-negative, so the remainder chain never goes negative
    let g = old_r.abs().to_biguint().unwrap_or_default();
    (g, old_x, old_y)
}

/// Compute modular inverse: a^(-1) mod m
/// Fails with `NoInverse` when gcd(a, m) != 1
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if m.is_zero() {
        return Err(RsaError::NoInverse);
    }

    let (g, x, _) = extended_gcd(a, m);
    if !g.is_one() {
        return Err(RsaError::NoInverse);
    }

    let m_signed = BigInt::from(m.clone());
    x.mod_floor(&m_signed)
        .to_biguint()
        .ok_or(RsaError::NoInverse)
}

/// Miller-Rabin primality test using the thread-local generator
/// Returns true if n is probably prime (error bound 4^-rounds)
pub fn is_probable_prime(n: &RsaBigInt, rounds: u32) -> bool {
    is_probable_prime_with_rng(n, rounds, &mut thread_rng())
}

/// Miller-Rabin primality test drawing witnesses from `rng`
pub fn is_probable_prime_with_rng<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    let two = RsaBigInt::from(2u8);
    if n < &two {
        return false;
    }
    if n == &two || n == &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^r with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        // Random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..r {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Odd primes used to discard prime candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 65] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317,
];

fn has_small_factor(candidate: &RsaBigInt) -> bool {
    SMALL_PRIMES
        .iter()
        .any(|&p| (candidate % p).is_zero() && *candidate != RsaBigInt::from(p))
}

/// Random odd integer of exactly `bits` bits (top and low bit forced)
pub fn random_odd_with_bits<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> RsaBigInt {
    let mut candidate = rng.gen_biguint(bits);
    candidate |= (RsaBigInt::one() << (bits - 1)) | RsaBigInt::one();
    candidate
}

/// Generate a random prime of the specified bit length
pub fn random_prime_with_rng<R: Rng + ?Sized>(bits: u64, rounds: u32, rng: &mut R) -> RsaBigInt {
    let mut candidates = 0u64;
    loop {
        candidates += 1;
        let candidate = random_odd_with_bits(bits, rng);
        if has_small_factor(&candidate) {
            continue;
        }
        if is_probable_prime_with_rng(&candidate, rounds, rng) {
            tracing::debug!(bits, candidates, "prime found");
            return candidate;
        }
    }
}
