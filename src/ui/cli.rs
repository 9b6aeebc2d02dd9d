// Command Line Front End
// Parses arguments, installs logging and dispatches to the RSA core

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crate::rsa::{
    decrypt_to_string, encrypt_string, format_ciphertext, generate_keypair_with_rng,
    parse_ciphertext, require_key, sign, sign_and_verify_demo, verify, KeySize, RsaPrivateKey,
    RsaPublicKey,
};
use crate::ui::session::{Session, HELP};
use crate::util::config::RsaConfig;
use crate::util::digest::Sha256Digest;

#[derive(Parser)]
#[command(name = "rsa-edu")]
#[command(about = "Educational RSA: key generation, block encryption and signatures")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed the random generator for reproducible keys.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Miller-Rabin rounds per prime candidate.
    #[arg(long, global = true, default_value_t = crate::util::config::DEFAULT_MILLER_RABIN_ROUNDS)]
    rounds: u32,

    /// Starting public exponent.
    #[arg(long, global = true, default_value_t = crate::util::config::DEFAULT_PUBLIC_EXPONENT)]
    exponent: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Public half of a key, as hex.
#[derive(Args)]
struct PublicKeyArgs {
    /// Public exponent (hex).
    #[arg(short, long)]
    e: Option<String>,

    /// Modulus (hex).
    #[arg(short, long)]
    n: Option<String>,
}

/// Private half of a key, as hex.
#[derive(Args)]
struct PrivateKeyArgs {
    /// Private exponent (hex).
    #[arg(short, long)]
    d: Option<String>,

    /// Modulus (hex).
    #[arg(short, long)]
    n: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair and print it as hex.
    Keygen {
        /// Key size in bits: 512, 1024, 2048 or 4096.
        #[arg(short, long, default_value_t = 1024)]
        bits: u32,
    },

    /// Encrypt a message into comma-separated hex blocks.
    Encrypt {
        #[command(flatten)]
        key: PublicKeyArgs,

        /// Message to encrypt.
        message: String,
    },

    /// Decrypt comma-separated hex blocks.
    Decrypt {
        #[command(flatten)]
        key: PrivateKeyArgs,

        /// Ciphertext blocks.
        ciphertext: String,
    },

    /// Sign a message (SHA-256 digest).
    Sign {
        #[command(flatten)]
        key: PrivateKeyArgs,

        /// Message to sign.
        message: String,
    },

    /// Verify a signature (SHA-256 digest).
    Verify {
        #[command(flatten)]
        key: PublicKeyArgs,

        /// Signature as hex.
        #[arg(short, long)]
        signature: String,

        /// Message that was signed.
        message: String,
    },

    /// Generate keys, sign and verify in one go.
    Demo {
        /// Key size in bits.
        #[arg(short, long, default_value_t = 1024)]
        bits: u32,

        /// Message to sign.
        #[arg(default_value = "HELLO WORLD")]
        message: String,
    },

    /// Line-oriented session holding one key pair.
    Shell,
}

/// How the process should end when no error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    SignatureRejected,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::SignatureRejected => 2,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

fn verify_status(valid: bool) -> RunStatus {
    if valid {
        RunStatus::Success
    } else {
        RunStatus::SignatureRejected
    }
}

fn public_key(args: &PublicKeyArgs) -> Result<RsaPublicKey> {
    let e = require_key(args.e.as_ref(), "public")?;
    let n = require_key(args.n.as_ref(), "public")?;
    Ok(RsaPublicKey::from_hex(e, n)?)
}

fn private_key(args: &PrivateKeyArgs) -> Result<RsaPrivateKey> {
    let d = require_key(args.d.as_ref(), "private")?;
    let n = require_key(args.n.as_ref(), "private")?;
    Ok(RsaPrivateKey::from_hex(d, n)?)
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}

/// Entry point used by the binary
pub fn run() -> Result<RunStatus> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = RsaConfig::default()
        .with_rounds(cli.rounds)
        .with_public_exponent(cli.exponent);
    config.validate()?;

    let mut rng: Box<dyn RngCore> = match cli.seed {
        Some(seed) => {
            info!(seed, "using seeded generator");
            Box::new(StdRng::seed_from_u64(seed))
        }
        None => Box::new(thread_rng()),
    };

    match cli.command {
        Commands::Keygen { bits } => {
            let key_size = KeySize::try_from(bits)?;
            let keypair = generate_keypair_with_rng(key_size, &config, &mut *rng)
                .context("Key generation failed")?;
            println!("{}", keypair.info());
        }

        Commands::Encrypt { key, message } => {
            let key = public_key(&key)?;
            let ciphertext = encrypt_string(&message, &key).context("Encryption failed")?;
            println!("{}", format_ciphertext(&ciphertext));
        }

        Commands::Decrypt { key, ciphertext } => {
            let key = private_key(&key)?;
            let blocks = parse_ciphertext(&ciphertext)?;
            let plaintext = decrypt_to_string(&blocks, &key).context("Decryption failed")?;
            println!("{}", plaintext);
        }

        Commands::Sign { key, message } => {
            let key = private_key(&key)?;
            let signature = sign(&message, &key, &Sha256Digest).context("Signing failed")?;
            println!("{}", signature);
        }

        Commands::Verify { key, signature, message } => {
            let key = public_key(&key)?;
            let valid = verify(&message, &signature, &key, &Sha256Digest)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            return Ok(verify_status(valid));
        }

        Commands::Demo { bits, message } => {
            let key_size = KeySize::try_from(bits)?;
            let demo = sign_and_verify_demo(&message, key_size, &config, &Sha256Digest, &mut *rng)?;
            println!("message:   {}", demo.message);
            println!("digest:    {}", demo.message_hash);
            println!("n:         {:x}", demo.public_key.n);
            println!("e:         {:x}", demo.public_key.e);
            println!("signature: {}", demo.signature);
            println!("verified:  {}", demo.verification);
            for step in demo.process_steps {
                println!("  {}", step);
            }
        }

        Commands::Shell => run_shell(Session::new(config), &mut *rng)?,
    }

    Ok(RunStatus::Success)
}

fn run_shell(mut session: Session, rng: &mut dyn RngCore) -> Result<()> {
    println!("{}", HELP);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "rsa> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }

        match session.execute(trimmed, rng) {
            Ok(output) => println!("{}", output),
            Err(e) => println!("error: {}", e),
        }
    }

    Ok(())
}
