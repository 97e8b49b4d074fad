//! Command framing, status codes, and the AEAD data model for the HSM client.
//!
//! This crate implements the device's binary command protocol: one-byte
//! opcodes, little-endian integer fields, and strict per-command length
//! contracts. It knows nothing about transports; callers hand complete
//! frames to a byte channel and feed received frames back in.
//!
//! ## Wire format
//!
//! ```text
//! request   +--------+---------------------------+
//!           | opcode | payload (opcode-specific) |
//!           +--------+---------------------------+
//!           no length prefix, delimiter, or checksum;
//!           message boundaries are transport-defined
//!
//! response  +--------+---------------------------+
//!           | status | body (only when status=OK)|
//!           +--------+---------------------------+
//!           fire-and-forget commands have no response at all
//! ```
//!
//! The AEAD command family seals secrets into opaque blobs the device alone
//! can open. Validation is decrypt-and-compare inside the device: the
//! client learns match/no-match, never plaintext.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aead;
pub mod command;
pub mod defines;
pub mod error;
pub mod monitor;
pub mod secret;
pub mod status;
pub mod system;

// Re-export main types
pub use aead::{Aead, GenerateAead, GenerateRandomAead, ValidateAead};
pub use command::{decode_response, encode_frame, Command, ResponseLen};
pub use defines::{
    KeyHandleFlags, Nonce, Opcode, AEAD_MAC_SIZE, AEAD_MAX_SIZE, DATA_BUF_SIZE, KEY_SIZE,
    MONITOR_EXIT_MAGIC, NONCE_SIZE, UID_SIZE,
};
pub use error::{InputError, WireError};
pub use monitor::MonitorExit;
pub use secret::WrappedSecret;
pub use status::StatusCode;
pub use system::{Echo, RandomGenerate, SystemInfo, SystemInfoQuery, SYSTEM_UID_SIZE};
