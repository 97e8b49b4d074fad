//! Command-line interface for driving an attached hardware security module.
//!
//! Connects to the device's serial-over-TCP bridge and runs one command
//! per invocation: sealing secrets into AEADs, validating stored AEADs,
//! or the small query/mode commands. Sealed blobs print as hex or are
//! written in the storage format `aead` files use.

mod config;
mod logging;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hsm_session::{DeviceMode, Session, SessionConfig};
use hsm_wire::{Aead, Nonce, WrappedSecret, NONCE_SIZE};
use tracing::info;

#[derive(Parser)]
#[command(name = "hsm-client", version, about = "Drive an attached hardware security module")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device bridge address, overriding config
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Key handle (decimal or 0x-prefixed), overriding config
    #[arg(long, global = true)]
    key_handle: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Seal plaintext into an AEAD
    Generate {
        /// 6-byte nonce as hex
        #[arg(long)]
        nonce: String,
        /// Hex plaintext to seal
        #[arg(long, conflicts_with_all = ["key", "uid"])]
        plaintext: Option<String>,
        /// Hex 16-byte key; with --uid, seals a wrapped secret
        #[arg(long, requires = "uid")]
        key: Option<String>,
        /// Hex 6-byte public identifier
        #[arg(long, requires = "key")]
        uid: Option<String>,
        /// Write the sealed blob to this file instead of printing hex
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Seal device-generated randomness into an AEAD
    GenerateRandom {
        /// 6-byte nonce as hex
        #[arg(long)]
        nonce: String,
        /// How many random bytes the device should seal
        #[arg(long)]
        num_bytes: u8,
        /// Write the sealed blob to this file instead of printing hex
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a stored AEAD against expected plaintext
    Validate {
        /// File holding a sealed blob in storage form
        #[arg(long)]
        aead: PathBuf,
        /// Hex plaintext the blob is expected to contain
        #[arg(long)]
        plaintext: String,
    },

    /// Echo bytes off the device
    Echo {
        /// Hex payload to echo
        data: String,
    },

    /// Show firmware version and system identity
    Info,

    /// Fetch device randomness in the clear
    Random {
        #[arg(long, default_value_t = 16)]
        num_bytes: u8,
    },

    /// Send the monitor-exit handshake
    MonitorExit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let mut cfg = config::load_config(cli.config.as_deref())?;
    if let Some(addr) = cli.addr {
        cfg.device_addr = addr;
    }
    if let Some(handle) = &cli.key_handle {
        cfg.key_handle = config::parse_key_handle(handle)?;
    }

    let addr = cfg
        .device_addr
        .parse()
        .with_context(|| format!("invalid device address '{}'", cfg.device_addr))?;
    info!("connecting to device at {}", cfg.device_addr);
    let stream = hsm_session::connect_tcp(addr)
        .await
        .with_context(|| format!("failed to connect to {}", cfg.device_addr))?;
    let mut session = Session::with_config(
        stream,
        SessionConfig {
            read_timeout: cfg.read_timeout()?,
        },
    );

    match cli.command {
        Cmd::Generate {
            nonce,
            plaintext,
            key,
            uid,
            out,
        } => {
            let nonce = parse_nonce(&nonce)?;
            let aead = match (plaintext, key, uid) {
                (Some(plaintext), None, None) => {
                    let plaintext = parse_hex(&plaintext, "plaintext")?;
                    session
                        .generate_aead(nonce, cfg.key_handle, &plaintext)
                        .await?
                }
                (None, Some(key), Some(uid)) => {
                    let secret = WrappedSecret::new(
                        &parse_hex(&key, "key")?,
                        &parse_hex(&uid, "uid")?,
                    )?;
                    session
                        .generate_aead_simple(nonce, cfg.key_handle, &secret)
                        .await?
                }
                _ => bail!("pass either --plaintext or --key with --uid"),
            };
            emit_aead(&aead, out.as_deref())?;
        }

        Cmd::GenerateRandom {
            nonce,
            num_bytes,
            out,
        } => {
            let nonce = parse_nonce(&nonce)?;
            let aead = session
                .generate_aead_random(nonce, cfg.key_handle, num_bytes)
                .await?;
            emit_aead(&aead, out.as_deref())?;
        }

        Cmd::Validate { aead, plaintext } => {
            let bytes = fs::read(&aead)
                .with_context(|| format!("failed to read {}", aead.display()))?;
            let aead = Aead::from_bytes(&bytes).context("malformed sealed blob")?;
            let expected = parse_hex(&plaintext, "plaintext")?;

            let matched = session
                .validate_aead(*aead.nonce(), aead.key_handle(), &aead, &expected)
                .await?;
            println!("{}", if matched { "match" } else { "no match" });
            if !matched {
                std::process::exit(1);
            }
        }

        Cmd::Echo { data } => {
            let echoed = session.echo(&parse_hex(&data, "data")?).await?;
            println!("{}", hex::encode(echoed));
        }

        Cmd::Info => {
            let info = session.system_info().await?;
            println!(
                "firmware {}.{}.{} protocol {} sysid {}",
                info.version_major,
                info.version_minor,
                info.version_build,
                info.protocol_version,
                hex::encode(info.system_uid)
            );
        }

        Cmd::Random { num_bytes } => {
            let bytes = session.random(num_bytes).await?;
            println!("{}", hex::encode(bytes));
        }

        Cmd::MonitorExit => {
            let mut session = session.starting_in(DeviceMode::Monitor);
            session.monitor_exit().await?;
            println!("monitor exit sent");
        }
    }

    Ok(())
}

fn parse_nonce(s: &str) -> Result<Nonce> {
    let bytes = parse_hex(s, "nonce")?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("nonce must be exactly {} bytes", NONCE_SIZE))
}

fn parse_hex(s: &str, what: &str) -> Result<Vec<u8>> {
    hex::decode(s).with_context(|| format!("{what} is not valid hex"))
}

fn emit_aead(aead: &Aead, out: Option<&std::path::Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, aead.to_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote sealed blob to {}", path.display());
        }
        None => println!("{}", hex::encode(aead.to_bytes())),
    }
    Ok(())
}
