// Key Generation Configuration
// Tunables for primality confidence and public exponent selection

use crate::rsa::error::{RsaError, RsaResult};

/// Default Miller-Rabin rounds (false positive bound 4^-10)
pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 10;

/// Default public exponent candidate
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Default bound on the "e += 2 until coprime" search
pub const DEFAULT_MAX_EXPONENT_ATTEMPTS: u32 = 1024;

/// Configuration for RSA key generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaConfig {
    pub miller_rabin_rounds: u32,
    pub public_exponent: u64,
    pub max_exponent_attempts: u32,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            max_exponent_attempts: DEFAULT_MAX_EXPONENT_ATTEMPTS,
        }
    }
}

impl RsaConfig {
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    pub fn with_public_exponent(mut self, e: u64) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn with_max_exponent_attempts(mut self, attempts: u32) -> Self {
        self.max_exponent_attempts = attempts;
        self
    }

    /// Check the configuration before spending time on prime search
    pub fn validate(&self) -> RsaResult<()> {
        if self.miller_rabin_rounds == 0 {
            return Err(RsaError::InvalidInput(
                "Miller-Rabin rounds must be at least 1".to_string(),
            ));
        }
        if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
            return Err(RsaError::InvalidInput(format!(
                "Public exponent must be odd and at least 3, got {}",
                self.public_exponent
            )));
        }
        if self.max_exponent_attempts == 0 {
            return Err(RsaError::InvalidInput(
                "Exponent search needs at least one attempt".to_string(),
            ));
        }
        Ok(())
    }
}
