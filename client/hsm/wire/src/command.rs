//! Request/response contract shared by every device command.
//!
//! A command is built per call, sent exactly once, and consumed to produce
//! exactly one typed result or error. The per-command response parser is
//! selected at compile time through the [`Command`] trait; there is no
//! runtime dispatch on response contents.

use bytes::{BufMut, Bytes, BytesMut};

use crate::defines::Opcode;
use crate::error::WireError;
use crate::status::StatusCode;

/// Expected response shape for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseLen {
    /// Fire-and-forget: the device sends nothing back
    None,
    /// Exactly this many body bytes follow the status byte on success
    Body(usize),
}

/// One request/response exchange with the device.
///
/// Implementations pack their request payload into bytes and turn a
/// validated response body into a typed value. Status inspection and
/// length validation happen in [`decode_response`], before `parse` runs.
pub trait Command {
    /// Typed result produced from a validated response body
    type Output;

    /// Opcode identifying this command on the wire
    fn opcode(&self) -> Opcode;

    /// Response contract for this particular invocation
    fn response(&self) -> ResponseLen;

    /// Pack the request payload (opcode byte excluded)
    fn encode(&self, buf: &mut BytesMut);

    /// Turn a validated response body into the typed result
    fn parse(&self, body: &[u8]) -> Result<Self::Output, WireError>;
}

/// Build the wire frame for a command: the opcode byte followed by the
/// packed payload. There is no length prefix, delimiter, or checksum;
/// message boundaries belong to the transport.
pub fn encode_frame<C: Command>(cmd: &C) -> Bytes {
    let mut buf = BytesMut::with_capacity(64);
    buf.put_u8(cmd.opcode() as u8);
    cmd.encode(&mut buf);
    buf.freeze()
}

/// Validate a raw response frame and run the command's parser.
///
/// `frame` is the status byte plus body for structured responses, or empty
/// for fire-and-forget commands. A non-success status fails the call with
/// [`WireError::Failed`] before the command's `parse` is ever invoked.
pub fn decode_response<C: Command>(cmd: &C, frame: &[u8]) -> Result<C::Output, WireError> {
    match cmd.response() {
        ResponseLen::None => {
            if !frame.is_empty() {
                return Err(WireError::Length {
                    expected: 0,
                    got: frame.len(),
                });
            }
            cmd.parse(&[])
        }
        ResponseLen::Body(expected) => {
            let (&status, body) = frame.split_first().ok_or(WireError::Incomplete)?;
            let status = StatusCode::try_from(status)?;
            if !status.is_ok() {
                return Err(WireError::Failed(status));
            }
            if body.len() != expected {
                return Err(WireError::Length {
                    expected,
                    got: body.len(),
                });
            }
            cmd.parse(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        response: ResponseLen,
    }

    impl Command for Probe {
        type Output = Vec<u8>;

        fn opcode(&self) -> Opcode {
            Opcode::Echo
        }

        fn response(&self) -> ResponseLen {
            self.response
        }

        fn encode(&self, buf: &mut BytesMut) {
            buf.put_u8(0xAA);
        }

        fn parse(&self, body: &[u8]) -> Result<Self::Output, WireError> {
            Ok(body.to_vec())
        }
    }

    #[test]
    fn test_frame_is_opcode_then_payload() {
        let cmd = Probe {
            response: ResponseLen::Body(0),
        };
        assert_eq!(encode_frame(&cmd).as_ref(), &[0x23, 0xAA]);
    }

    #[test]
    fn test_status_checked_before_parse() {
        let cmd = Probe {
            response: ResponseLen::Body(4),
        };
        // InvalidParameter with a body present: the status must win and the
        // body must never reach parse.
        let err = decode_response(&cmd, &[0x8C, 1, 2, 3, 4]).unwrap_err();
        assert!(matches!(
            err,
            WireError::Failed(StatusCode::InvalidParameter)
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let cmd = Probe {
            response: ResponseLen::Body(4),
        };
        let err = decode_response(&cmd, &[0x80, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, WireError::Length { expected: 4, got: 3 }));
    }

    #[test]
    fn test_unknown_status_is_protocol_error() {
        let cmd = Probe {
            response: ResponseLen::Body(0),
        };
        let err = decode_response(&cmd, &[0x55]).unwrap_err();
        assert!(matches!(err, WireError::Status(0x55)));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let cmd = Probe {
            response: ResponseLen::Body(0),
        };
        assert!(matches!(
            decode_response(&cmd, &[]).unwrap_err(),
            WireError::Incomplete
        ));
    }

    #[test]
    fn test_fire_and_forget_accepts_nothing() {
        let cmd = Probe {
            response: ResponseLen::None,
        };
        assert!(decode_response(&cmd, &[]).is_ok());
        assert!(matches!(
            decode_response(&cmd, &[0x80]).unwrap_err(),
            WireError::Length { expected: 0, got: 1 }
        ));
    }
}
