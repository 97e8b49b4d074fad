//! Core device session: one channel, one command in flight.
//!
//! The protocol is strictly sequential request/response over a half-duplex
//! channel. `&mut self` on [`Session::execute`] is the concurrency model:
//! at most one outstanding command, blocking until its full response (or,
//! for fire-and-forget commands, until the write completes). No command is
//! cancellable mid-flight: aborting between write and read desynchronizes
//! framing for everything that follows, so cancellation is "drop the
//! session and reconnect", never a partial abort.

use std::io;
use std::time::Duration;

use bytes::{BufMut, BytesMut};
use hsm_wire::{decode_response, encode_frame, Command, ResponseLen, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::error::HsmError;
use crate::transport::Transport;

/// Configuration for a device session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// How long to wait for each response region before giving up
    pub read_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(2),
        }
    }
}

/// Device operating mode as last observed by this session.
///
/// Process-external state: the device owns it, the session tracks it
/// explicitly instead of leaving it ambient. Only the monitor-exit
/// command changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    /// Normal command processing
    Configuration,
    /// Debug/monitor mode
    Monitor,
}

/// Traffic counters for a session
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    /// Request frames written
    pub frames_sent: u64,
    /// Responses fully received
    pub frames_received: u64,
    /// Total bytes written
    pub bytes_out: u64,
    /// Total bytes read
    pub bytes_in: u64,
}

/// An exclusively-owned command session with one device
#[derive(Debug)]
pub struct Session<S> {
    stream: S,
    config: SessionConfig,
    mode: DeviceMode,
    stats: SessionStats,
}

impl<S: Transport> Session<S> {
    /// Open a session over `stream` with default configuration
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, SessionConfig::default())
    }

    /// Open a session over `stream` with explicit configuration
    pub fn with_config(stream: S, config: SessionConfig) -> Self {
        Self {
            stream,
            config,
            mode: DeviceMode::Configuration,
            stats: SessionStats::default(),
        }
    }

    /// Declare the device's starting mode, for callers attaching to a
    /// device known to sit in monitor mode.
    pub fn starting_in(mut self, mode: DeviceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Device mode as last observed
    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    /// Traffic counters
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Give the channel back, ending the session. The only safe way to
    /// recover from a protocol error is through here: reopen the channel.
    pub fn into_inner(self) -> S {
        self.stream
    }

    pub(crate) fn note_mode(&mut self, mode: DeviceMode) {
        self.mode = mode;
    }

    /// Issue one command and block for its typed result.
    ///
    /// Writes the frame, then reads the status byte and, only on a
    /// success status, the body the command declared. A non-success
    /// status terminates the response, so nothing further is read for it.
    pub async fn execute<C: Command>(&mut self, cmd: &C) -> Result<C::Output, HsmError> {
        let frame = encode_frame(cmd);
        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;
        self.stats.frames_sent += 1;
        self.stats.bytes_out += frame.len() as u64;
        trace!(opcode = ?cmd.opcode(), len = frame.len(), "frame written");

        let body_len = match cmd.response() {
            ResponseLen::None => {
                // Success is "frame written"; reading would hang forever.
                return Ok(decode_response(cmd, &[])?);
            }
            ResponseLen::Body(n) => n,
        };

        let mut response = BytesMut::with_capacity(1 + body_len);

        let mut status = [0u8; 1];
        self.read_exact_timed(&mut status).await?;
        response.put_u8(status[0]);

        // Only a success status carries a body; anything else ends the
        // response at the status byte.
        let success = matches!(StatusCode::try_from(status[0]), Ok(s) if s.is_ok());
        if success && body_len > 0 {
            let mut body = vec![0u8; body_len];
            self.read_exact_timed(&mut body).await?;
            response.put_slice(&body);
        }

        self.stats.frames_received += 1;
        self.stats.bytes_in += response.len() as u64;
        trace!(opcode = ?cmd.opcode(), len = response.len(), "response read");

        Ok(decode_response(cmd, &response)?)
    }

    async fn read_exact_timed(&mut self, buf: &mut [u8]) -> Result<(), HsmError> {
        match timeout(self.config.read_timeout, self.stream.read_exact(buf)).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => {
                debug!(timeout = ?self.config.read_timeout, "device read timed out");
                Err(HsmError::Transport(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "device read timed out",
                )))
            }
        }
    }
}
