//! Device status codes.
//!
//! Every structured response leads with one of these bytes. The status is
//! inspected before any response body is trusted; it is never application
//! data.

/// Status byte returned in every structured response
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// Command processed successfully
    Ok = 0x80,
    /// Key handle is not usable
    KeyHandleInvalid = 0x81,
    /// Sealed blob failed integrity checks
    AeadInvalid = 0x82,
    /// One-time password rejected
    OtpInvalid = 0x83,
    /// One-time password replayed
    OtpReplay = 0x84,
    /// Identity already stored
    IdDuplicate = 0x85,
    /// Identity not found
    IdNotFound = 0x86,
    /// Internal database full
    DbFull = 0x87,
    /// Device memory error
    MemoryError = 0x88,
    /// Function disabled in this configuration
    FunctionDisabled = 0x89,
    /// Key storage is locked
    KeyStorageLocked = 0x8A,
    /// Decrypt-and-compare found differing plaintext
    Mismatch = 0x8B,
    /// Malformed size, out-of-range argument, or unauthorized key handle
    InvalidParameter = 0x8C,
}

impl StatusCode {
    /// Whether this status reports success
    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }
}

impl TryFrom<u8> for StatusCode {
    type Error = crate::WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x80 => Ok(StatusCode::Ok),
            0x81 => Ok(StatusCode::KeyHandleInvalid),
            0x82 => Ok(StatusCode::AeadInvalid),
            0x83 => Ok(StatusCode::OtpInvalid),
            0x84 => Ok(StatusCode::OtpReplay),
            0x85 => Ok(StatusCode::IdDuplicate),
            0x86 => Ok(StatusCode::IdNotFound),
            0x87 => Ok(StatusCode::DbFull),
            0x88 => Ok(StatusCode::MemoryError),
            0x89 => Ok(StatusCode::FunctionDisabled),
            0x8A => Ok(StatusCode::KeyStorageLocked),
            0x8B => Ok(StatusCode::Mismatch),
            0x8C => Ok(StatusCode::InvalidParameter),
            _ => Err(crate::WireError::Status(value)),
        }
    }
}
