//! AEAD operations and device queries, as session methods.
//!
//! The key-handle permission model applies to every operation here: the
//! device holds an opaque permission bitmask per handle, and an operation
//! against a handle lacking the required flag is rejected with the same
//! invalid-parameter status as a malformed request. The client cannot tell
//! "wrong handle", "bad size", and "permission denied" apart without
//! out-of-band knowledge of how the handles were provisioned.

use bytes::Bytes;
use hsm_wire::{
    Aead, Echo, GenerateAead, GenerateRandomAead, MonitorExit, Nonce, RandomGenerate, StatusCode,
    SystemInfo, SystemInfoQuery, ValidateAead, WrappedSecret,
};
use tracing::debug;

use crate::error::HsmError;
use crate::session::{DeviceMode, Session};
use crate::transport::Transport;

impl<S: Transport> Session<S> {
    /// Seal caller-supplied plaintext into an AEAD under `key_handle`.
    ///
    /// The handle must be provisioned with the generate flag and the
    /// plaintext must fit the device's sealed-payload ceiling; either
    /// violation comes back as an invalid-parameter command failure.
    pub async fn generate_aead(
        &mut self,
        nonce: Nonce,
        key_handle: u32,
        plaintext: &[u8],
    ) -> Result<Aead, HsmError> {
        let cmd = GenerateAead::new(nonce, key_handle, Bytes::copy_from_slice(plaintext));
        let aead = self.execute(&cmd).await?;
        debug!(key_handle, len = aead.data().len(), "generated AEAD");
        Ok(aead)
    }

    /// Seal a wrapped secret (key plus public identifier) into an AEAD
    pub async fn generate_aead_simple(
        &mut self,
        nonce: Nonce,
        key_handle: u32,
        secret: &WrappedSecret,
    ) -> Result<Aead, HsmError> {
        self.generate_aead(nonce, key_handle, &secret.pack()).await
    }

    /// Seal `num_bytes` of device-generated randomness into an AEAD.
    ///
    /// The plaintext never leaves the device. Out-of-range sizes are sent
    /// as-is and surface as the device's invalid-parameter rejection.
    pub async fn generate_aead_random(
        &mut self,
        nonce: Nonce,
        key_handle: u32,
        num_bytes: u8,
    ) -> Result<Aead, HsmError> {
        let cmd = GenerateRandomAead::new(nonce, key_handle, num_bytes);
        let aead = self.execute(&cmd).await?;
        debug!(key_handle, num_bytes, "generated random AEAD");
        Ok(aead)
    }

    /// Ask the device to decrypt `aead` and compare it against `expected`.
    ///
    /// Returns `true` on a match and `false` on a mismatch, including the
    /// mismatch a wrong nonce/key-handle pairing necessarily produces. The
    /// decrypted bytes never cross the wire in either case. Every other
    /// non-success status (unauthorized handle, malformed sizes) is an
    /// error, not a negative result.
    pub async fn validate_aead(
        &mut self,
        nonce: Nonce,
        key_handle: u32,
        aead: &Aead,
        expected: &[u8],
    ) -> Result<bool, HsmError> {
        let cmd = ValidateAead::new(nonce, key_handle, aead, Bytes::copy_from_slice(expected));
        match self.execute(&cmd).await {
            Ok(matched) => Ok(matched),
            Err(HsmError::Command(StatusCode::Mismatch)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Echo a payload off the device
    pub async fn echo(&mut self, data: &[u8]) -> Result<Bytes, HsmError> {
        self.execute(&Echo::new(Bytes::copy_from_slice(data))).await
    }

    /// Query firmware version and system identity
    pub async fn system_info(&mut self) -> Result<SystemInfo, HsmError> {
        self.execute(&SystemInfoQuery).await
    }

    /// Fetch `num_bytes` of device randomness in the clear
    pub async fn random(&mut self, num_bytes: u8) -> Result<Bytes, HsmError> {
        self.execute(&RandomGenerate::new(num_bytes)).await
    }

    /// Send the monitor-exit handshake and record the device back in
    /// configuration mode. Fire-and-forget: nothing is read, success is
    /// the completed write.
    pub async fn monitor_exit(&mut self) -> Result<(), HsmError> {
        self.execute(&MonitorExit).await?;
        self.note_mode(DeviceMode::Configuration);
        debug!("monitor exit sent, device returning to configuration mode");
        Ok(())
    }
}
