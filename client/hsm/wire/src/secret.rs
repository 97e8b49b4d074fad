//! Wrapped-secret plaintext record.
//!
//! The caller-held record that AEAD commands seal or validate: a 16-byte
//! symmetric key concatenated with a 6-byte public identifier. The packed
//! form is the exact plaintext the device sees.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::defines::{KEY_SIZE, UID_SIZE};
use crate::error::InputError;

/// A secret to be sealed: symmetric key plus public identifier
#[derive(Clone, PartialEq, Eq)]
pub struct WrappedSecret {
    key: [u8; KEY_SIZE],
    uid: [u8; UID_SIZE],
}

impl WrappedSecret {
    /// Packed length: key and uid concatenated, no padding
    pub const PACKED_SIZE: usize = KEY_SIZE + UID_SIZE;

    /// Build a secret from raw parts, rejecting wrong lengths before any
    /// bytes can reach the wire.
    pub fn new(key: &[u8], uid: &[u8]) -> Result<Self, InputError> {
        let key: [u8; KEY_SIZE] = key
            .try_into()
            .map_err(|_| InputError::KeyLength(key.len()))?;
        let uid: [u8; UID_SIZE] = uid
            .try_into()
            .map_err(|_| InputError::UidLength(uid.len()))?;
        Ok(Self { key, uid })
    }

    /// The public identifier
    pub fn uid(&self) -> &[u8; UID_SIZE] {
        &self.uid
    }

    /// Pack into the 22-byte `key ‖ uid` wire form
    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::PACKED_SIZE);
        buf.put_slice(&self.key);
        buf.put_slice(&self.uid);
        buf.freeze()
    }
}

// Key material stays out of logs and panic messages.
impl fmt::Debug for WrappedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedSecret")
            .field("key", &"<16 bytes>")
            .field("uid", &self.uid)
            .finish()
    }
}
