//! Protocol constants for the device command set.
//!
//! Sizes, opcodes, and key-handle permission flags as fixed by the device
//! firmware. Everything on the wire is little-endian.

use bitflags::bitflags;

/// Nonce length in bytes
pub const NONCE_SIZE: usize = 6;

/// Public identifier length in bytes
pub const UID_SIZE: usize = 6;

/// Symmetric key length in bytes
pub const KEY_SIZE: usize = 16;

/// Authentication tag appended to every sealed blob
pub const AEAD_MAC_SIZE: usize = 8;

/// Device-internal plaintext buffer size
pub const DATA_BUF_SIZE: usize = 64;

/// Ceiling on sealed data length (ciphertext plus tag)
pub const AEAD_MAX_SIZE: usize = DATA_BUF_SIZE + AEAD_MAC_SIZE;

/// Magic word for the monitor-exit handshake
pub const MONITOR_EXIT_MAGIC: u32 = 0xBAAD_BEEF;

/// A caller-chosen 6-byte nonce; not secret, binds a sealed blob to one use
pub type Nonce = [u8; NONCE_SIZE];

/// Command opcodes understood by the device
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Seal caller-supplied plaintext into an AEAD
    AeadGenerate = 0x01,
    /// Seal device-generated random plaintext into an AEAD
    RandomAeadGenerate = 0x03,
    /// Decrypt an AEAD in-device and compare against supplied plaintext
    AeadDecryptCmp = 0x04,
    /// Echo payload back unchanged
    Echo = 0x23,
    /// Generate random bytes on the device
    RandomGenerate = 0x24,
    /// Query firmware version and system identity
    SystemInfoQuery = 0x26,
    /// Leave monitor mode; no response is ever sent
    MonitorExit = 0x7F,
}

impl TryFrom<u8> for Opcode {
    type Error = crate::WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Opcode::AeadGenerate),
            0x03 => Ok(Opcode::RandomAeadGenerate),
            0x04 => Ok(Opcode::AeadDecryptCmp),
            0x23 => Ok(Opcode::Echo),
            0x24 => Ok(Opcode::RandomGenerate),
            0x26 => Ok(Opcode::SystemInfoQuery),
            0x7F => Ok(Opcode::MonitorExit),
            _ => Err(crate::WireError::Opcode(value)),
        }
    }
}

bitflags! {
    /// Permission bits a key handle can be provisioned with.
    ///
    /// The device enforces these; the client never holds an authoritative
    /// copy. The bits are only known client-side for provisioning tools and
    /// test fixtures.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyHandleFlags: u32 {
        /// Handle may seal caller-supplied plaintext
        const AEAD_GENERATE = 0x0000_0002;
        /// Handle may seal device-generated random plaintext
        const RANDOM_AEAD_GENERATE = 0x0000_0008;
        /// Handle may decrypt-and-compare sealed blobs
        const AEAD_DECRYPT_CMP = 0x0000_0010;
    }
}
