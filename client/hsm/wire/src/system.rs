//! Echo, randomness, and system-information query commands.

use bytes::{BufMut, Bytes, BytesMut};

use crate::command::{Command, ResponseLen};
use crate::defines::Opcode;
use crate::error::WireError;

/// Length of the system identity field in a system-info response
pub const SYSTEM_UID_SIZE: usize = 12;

/// Echo a payload off the device, unchanged
#[derive(Debug, Clone)]
pub struct Echo {
    data: Bytes,
}

impl Echo {
    /// Request an echo of `data`
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl Command for Echo {
    type Output = Bytes;

    fn opcode(&self) -> Opcode {
        Opcode::Echo
    }

    fn response(&self) -> ResponseLen {
        // count byte plus the echoed payload
        ResponseLen::Body(1 + self.data.len())
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.data.len() as u8);
        buf.put_slice(&self.data);
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, WireError> {
        let (&count, echoed) = body.split_first().ok_or(WireError::Incomplete)?;
        if count as usize != echoed.len() {
            return Err(WireError::DeclaredLength {
                declared: count as usize,
                got: echoed.len(),
            });
        }
        Ok(Bytes::copy_from_slice(echoed))
    }
}

/// Generate random bytes on the device
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerate {
    num_bytes: u8,
}

impl RandomGenerate {
    /// Request `num_bytes` of device randomness, returned in the clear
    pub fn new(num_bytes: u8) -> Self {
        Self { num_bytes }
    }
}

impl Command for RandomGenerate {
    type Output = Bytes;

    fn opcode(&self) -> Opcode {
        Opcode::RandomGenerate
    }

    fn response(&self) -> ResponseLen {
        ResponseLen::Body(1 + self.num_bytes as usize)
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.num_bytes);
    }

    fn parse(&self, body: &[u8]) -> Result<Self::Output, WireError> {
        let (&count, bytes) = body.split_first().ok_or(WireError::Incomplete)?;
        if count as usize != bytes.len() {
            return Err(WireError::DeclaredLength {
                declared: count as usize,
                got: bytes.len(),
            });
        }
        Ok(Bytes::copy_from_slice(bytes))
    }
}

/// Firmware version and system identity reported by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// Firmware major version
    pub version_major: u8,
    /// Firmware minor version
    pub version_minor: u8,
    /// Firmware build number
    pub version_build: u8,
    /// Protocol version spoken by the device
    pub protocol_version: u8,
    /// Unique system identity
    pub system_uid: [u8; SYSTEM_UID_SIZE],
}

/// Query firmware version and system identity
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInfoQuery;

impl Command for SystemInfoQuery {
    type Output = SystemInfo;

    fn opcode(&self) -> Opcode {
        Opcode::SystemInfoQuery
    }

    fn response(&self) -> ResponseLen {
        ResponseLen::Body(4 + SYSTEM_UID_SIZE)
    }

    fn encode(&self, _buf: &mut BytesMut) {}

    fn parse(&self, body: &[u8]) -> Result<Self::Output, WireError> {
        let mut system_uid = [0u8; SYSTEM_UID_SIZE];
        system_uid.copy_from_slice(&body[4..]);
        Ok(SystemInfo {
            version_major: body[0],
            version_minor: body[1],
            version_build: body[2],
            protocol_version: body[3],
            system_uid,
        })
    }
}
