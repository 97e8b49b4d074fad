//! Codec error types.

use crate::status::StatusCode;
use thiserror::Error;

/// Framing and decode errors
#[derive(Error, Debug)]
pub enum WireError {
    /// Response frame empty or truncated
    #[error("truncated or empty frame")]
    Incomplete,

    /// Response length disagrees with the opcode's contract
    #[error("response length mismatch: expected {expected}, got {got}")]
    Length {
        /// Bytes the contract declares
        expected: usize,
        /// Bytes actually received
        got: usize,
    },

    /// An in-band length field disagrees with the bytes present
    #[error("declared length {declared} disagrees with {got} bytes present")]
    DeclaredLength {
        /// Length the response claims
        declared: usize,
        /// Bytes actually present
        got: usize,
    },

    /// Unknown status byte
    #[error("unknown status byte {0:#04x}")]
    Status(u8),

    /// Unknown opcode byte
    #[error("unknown opcode {0:#04x}")]
    Opcode(u8),

    /// Size limit exceeded
    #[error("size limit exceeded: {0}")]
    Size(usize),

    /// Device processed the frame but reported non-success
    #[error("command failed with status {0:?}")]
    Failed(StatusCode),
}

/// Caller-side constraint violations, rejected before any bytes are sent
#[derive(Error, Debug)]
pub enum InputError {
    /// Symmetric key has the wrong length
    #[error("key must be 16 bytes, got {0}")]
    KeyLength(usize),

    /// Public identifier has the wrong length
    #[error("uid must be 6 bytes, got {0}")]
    UidLength(usize),
}
