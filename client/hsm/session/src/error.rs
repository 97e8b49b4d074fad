//! Session error taxonomy.
//!
//! Four failure families, kept distinct so callers pattern-match on domain
//! outcomes instead of string-matching messages: transport I/O, protocol
//! violations, device-reported command failures, and caller-side input
//! constraints caught before any bytes are sent.

use hsm_wire::{InputError, StatusCode, WireError};
use thiserror::Error;

/// Any failure an HSM operation can produce
#[derive(Error, Debug)]
pub enum HsmError {
    /// I/O error or timeout from the byte channel, surfaced verbatim.
    /// Never retried here; retry policy belongs to the owner of the
    /// transport.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Response structure or length violated the opcode's contract.
    /// Framing is desynchronized: drop the session and reconnect.
    #[error("protocol error: {0}")]
    Protocol(WireError),

    /// The device processed the frame and reported non-success.
    /// Recoverable at the caller's discretion.
    #[error("command failed with status {0:?}")]
    Command(StatusCode),

    /// Caller-side constraint violation, rejected without a round trip
    #[error("input constraint: {0}")]
    Input(#[from] InputError),
}

// Split device-reported failures out of the codec's error type so status
// codes land in Command, everything else in Protocol.
impl From<WireError> for HsmError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Failed(status) => HsmError::Command(status),
            other => HsmError::Protocol(other),
        }
    }
}
