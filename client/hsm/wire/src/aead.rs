//! Sealed blobs and the AEAD command family.
//!
//! An [`Aead`] is opaque ciphertext plus an 8-byte tag, bound to the nonce
//! and key handle it was generated under. The client can store and forward
//! these values but can never open one; only the device decrypts, and only
//! inside the decrypt-and-compare command, which returns a status rather
//! than plaintext.

use bytes::{BufMut, Bytes, BytesMut};
use std::io;

use crate::command::{Command, ResponseLen};
use crate::defines::{Nonce, Opcode, AEAD_MAC_SIZE, AEAD_MAX_SIZE, NONCE_SIZE};
use crate::error::WireError;

/// An opaque sealed value: ciphertext plus tag, bound to nonce and key handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aead {
    nonce: Nonce,
    key_handle: u32,
    data: Bytes,
}

impl Aead {
    /// Assemble a sealed value from its parts, enforcing the protocol's
    /// size floor (one tag) and ceiling.
    pub fn from_parts(nonce: Nonce, key_handle: u32, data: Bytes) -> Result<Self, WireError> {
        if data.len() < AEAD_MAC_SIZE {
            return Err(WireError::Incomplete);
        }
        if data.len() > AEAD_MAX_SIZE {
            return Err(WireError::Size(data.len()));
        }
        Ok(Self {
            nonce,
            key_handle,
            data,
        })
    }

    /// Nonce the blob was sealed under
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Key handle the blob was sealed under
    pub fn key_handle(&self) -> u32 {
        self.key_handle
    }

    /// Ciphertext plus tag
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the sealed plaintext (data minus the tag)
    pub fn payload_len(&self) -> usize {
        self.data.len() - AEAD_MAC_SIZE
    }

    /// Serialize as `nonce(6) ‖ key_handle(u32 LE) ‖ data` for storage
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(NONCE_SIZE + 4 + self.data.len());
        buf.put_slice(&self.nonce);
        buf.put_u32_le(self.key_handle);
        buf.put_slice(&self.data);
        buf.freeze()
    }

    /// Deserialize the storage form produced by [`Aead::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < NONCE_SIZE + 4 + AEAD_MAC_SIZE {
            return Err(WireError::Incomplete);
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[..NONCE_SIZE]);
        let key_handle = u32::from_le_bytes(bytes[NONCE_SIZE..NONCE_SIZE + 4].try_into().unwrap());
        let data = Bytes::copy_from_slice(&bytes[NONCE_SIZE + 4..]);
        Self::from_parts(nonce, key_handle, data)
    }

    /// Write the storage form to a stream
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Read the storage form back from a stream
    pub fn read_from<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Seal caller-supplied plaintext under a key handle
#[derive(Debug, Clone)]
pub struct GenerateAead {
    nonce: Nonce,
    key_handle: u32,
    plaintext: Bytes,
}

impl GenerateAead {
    /// Request to seal `plaintext` under `key_handle` with `nonce`.
    ///
    /// Oversize plaintext is sent as-is; rejecting it is the device's
    /// contract, surfaced as an invalid-parameter status.
    pub fn new(nonce: Nonce, key_handle: u32, plaintext: impl Into<Bytes>) -> Self {
        Self {
            nonce,
            key_handle,
            plaintext: plaintext.into(),
        }
    }
}

impl Command for GenerateAead {
    type Output = Aead;

    fn opcode(&self) -> Opcode {
        Opcode::AeadGenerate
    }

    fn response(&self) -> ResponseLen {
        ResponseLen::Body(self.plaintext.len() + AEAD_MAC_SIZE)
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.nonce);
        buf.put_u32_le(self.key_handle);
        buf.put_slice(&self.plaintext);
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, WireError> {
        Aead::from_parts(self.nonce, self.key_handle, Bytes::copy_from_slice(body))
    }
}

/// Seal device-generated random plaintext under a key handle
#[derive(Debug, Clone)]
pub struct GenerateRandomAead {
    nonce: Nonce,
    key_handle: u32,
    num_bytes: u8,
}

impl GenerateRandomAead {
    /// Request `num_bytes` of device randomness sealed under `key_handle`.
    ///
    /// The valid range is `1..=AEAD_MAX_SIZE - AEAD_MAC_SIZE`; anything
    /// else is sent anyway and rejected by the device.
    pub fn new(nonce: Nonce, key_handle: u32, num_bytes: u8) -> Self {
        Self {
            nonce,
            key_handle,
            num_bytes,
        }
    }
}

impl Command for GenerateRandomAead {
    type Output = Aead;

    fn opcode(&self) -> Opcode {
        Opcode::RandomAeadGenerate
    }

    fn response(&self) -> ResponseLen {
        ResponseLen::Body(self.num_bytes as usize + AEAD_MAC_SIZE)
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.nonce);
        buf.put_u32_le(self.key_handle);
        buf.put_u8(self.num_bytes);
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, WireError> {
        Aead::from_parts(self.nonce, self.key_handle, Bytes::copy_from_slice(body))
    }
}

/// Decrypt a sealed blob in-device and compare against expected plaintext.
///
/// The comparison happens entirely inside the device; the response carries
/// a status and nothing else, so this command cannot be used as a
/// decryption oracle, only to confirm a guess.
#[derive(Debug, Clone)]
pub struct ValidateAead {
    nonce: Nonce,
    key_handle: u32,
    aead_data: Bytes,
    expected: Bytes,
}

impl ValidateAead {
    /// Request validation of `aead` against `expected` plaintext.
    ///
    /// The nonce and key handle name what to decrypt with, not where the
    /// blob came from: validating under a different handle than the one
    /// that sealed the blob simply fails to match.
    pub fn new(nonce: Nonce, key_handle: u32, aead: &Aead, expected: impl Into<Bytes>) -> Self {
        Self {
            nonce,
            key_handle,
            aead_data: Bytes::copy_from_slice(aead.data()),
            expected: expected.into(),
        }
    }
}

impl Command for ValidateAead {
    type Output = bool;

    fn opcode(&self) -> Opcode {
        Opcode::AeadDecryptCmp
    }

    fn response(&self) -> ResponseLen {
        ResponseLen::Body(0)
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.nonce);
        buf.put_u32_le(self.key_handle);
        buf.put_slice(&self.aead_data);
        buf.put_slice(&self.expected);
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, WireError> {
        // A match is the only success; a mismatch never reaches here (the
        // device reports it as a status, mapped by the session layer).
        Ok(true)
    }
}
