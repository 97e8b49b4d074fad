//! Mode-transition command: leave monitor mode.
//!
//! The device's two operating states are configuration mode and a
//! debug/monitor mode. This command is the only transition the client
//! models: monitor back to configuration. The payload is a magic word and
//! its one's-complement so line noise cannot trigger the transition, and
//! the device sends no acknowledgment of any kind.

use bytes::{BufMut, BytesMut};

use crate::command::{Command, ResponseLen};
use crate::defines::{Opcode, MONITOR_EXIT_MAGIC};
use crate::error::WireError;

/// Exit monitor mode and return to configuration mode
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorExit;

impl Command for MonitorExit {
    type Output = ();

    fn opcode(&self) -> Opcode {
        Opcode::MonitorExit
    }

    fn response(&self) -> ResponseLen {
        // Success is "frame written"; never wait for bytes.
        ResponseLen::None
    }

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(MONITOR_EXIT_MAGIC);
        buf.put_u32_le(0xFFFF_FFFF - MONITOR_EXIT_MAGIC);
    }

    fn parse(&self, _body: &[u8]) -> Result<Self::Output, WireError> {
        Ok(())
    }
}
