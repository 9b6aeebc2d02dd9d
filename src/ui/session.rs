// Interactive Session State
// Holds the caller's current key pair and routes text commands to the core

use rand::Rng;
use tracing::info;

use crate::rsa::{
    decrypt_to_string, encrypt_string, format_ciphertext, generate_keypair_with_rng,
    parse_ciphertext, require_key, sign, verify, Ciphertext, KeySize, RsaError, RsaKeyPair,
    RsaResult,
};
use crate::util::config::RsaConfig;
use crate::util::digest::Sha256Digest;

pub const HELP: &str = "\
commands:
  keygen [512|1024|2048|4096]   generate and hold a key pair
  info                          show the held key pair
  encrypt <text>                encrypt with the held public key
  decrypt <hex,hex,...>         decrypt with the held private key
  sign <text>                   sign with the held private key
  verify <signature> <text>     verify with the held public key
  clear                         forget the held key pair
  help                          show this message
  quit                          leave the shell";

/// The embedding application's view: at most one key pair at a time
#[derive(Debug, Default)]
pub struct Session {
    keypair: Option<RsaKeyPair>,
    config: RsaConfig,
}

impl Session {
    pub fn new(config: RsaConfig) -> Self {
        Self {
            keypair: None,
            config,
        }
    }

    pub fn generate_keys<R: Rng + ?Sized>(&mut self, key_size: KeySize, rng: &mut R) -> RsaResult<&RsaKeyPair> {
        let keypair = generate_keypair_with_rng(key_size, &self.config, rng)?;
        info!(bits = key_size.bits(), "session key pair replaced");
        let keypair = self.keypair.insert(keypair);
        Ok(&*keypair)
    }

    pub fn clear_keys(&mut self) {
        self.keypair = None;
    }

    /// The held key pair, or `KeyGeneration` if none was generated yet
    pub fn keypair(&self) -> RsaResult<&RsaKeyPair> {
        require_key(self.keypair.as_ref(), "session")
    }

    pub fn encrypt(&self, message: &str) -> RsaResult<Ciphertext> {
        encrypt_string(message, &self.keypair()?.public_key)
    }

    pub fn decrypt(&self, ciphertext: &[crate::rsa::RsaBigInt]) -> RsaResult<String> {
        decrypt_to_string(ciphertext, &self.keypair()?.private_key)
    }

    pub fn sign(&self, message: &str) -> RsaResult<String> {
        sign(message, &self.keypair()?.private_key, &Sha256Digest)
    }

    pub fn verify(&self, message: &str, signature: &str) -> RsaResult<bool> {
        verify(message, signature, &self.keypair()?.public_key, &Sha256Digest)
    }

    /// Run one shell line, returning the text to print
    pub fn execute<R: Rng + ?Sized>(&mut self, line: &str, rng: &mut R) -> RsaResult<String> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "keygen" => {
                let key_size = if rest.is_empty() {
                    KeySize::default()
                } else {
                    let bits = rest.parse::<u32>().map_err(|_| {
                        RsaError::InvalidInput(format!("Key size must be a number, got {:?}", rest))
                    })?;
                    KeySize::try_from(bits)?
                };
                let keypair = self.generate_keys(key_size, rng)?;
                Ok(format!("generated {}-bit key pair\n{}", key_size, keypair.info()))
            }
            "info" => Ok(self.keypair()?.info().to_string()),
            "encrypt" => Ok(format_ciphertext(&self.encrypt(rest)?)),
            "decrypt" => {
                let ciphertext = parse_ciphertext(rest)?;
                self.decrypt(&ciphertext)
            }
            "sign" => self.sign(rest),
            "verify" => {
                let (signature, message) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let valid = self.verify(message.trim(), signature)?;
                Ok(if valid { "valid" } else { "invalid" }.to_string())
            }
            "clear" => {
                self.clear_keys();
                Ok("keys cleared".to_string())
            }
            "help" | "" => Ok(HELP.to_string()),
            other => Err(RsaError::InvalidInput(format!(
                "Unknown command {:?}, try `help`",
                other
            ))),
        }
    }
}
