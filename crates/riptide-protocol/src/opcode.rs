//! Gateway operation codes.

use serde::{Deserialize, Serialize};

/// Operation code carried in the envelope `op` field.
///
/// Dispatch frames carry application events; every other op is a control
/// frame exchanged between the client and the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum OpCode {
    /// Application event, kind tag in `t`.
    Dispatch = 0,
    /// Keepalive, client to server (or an immediate-heartbeat request
    /// when sent by the server).
    Heartbeat = 1,
    /// Start a fresh session.
    Identify = 2,
    /// Update the client's presence.
    UpdatePresence = 3,
    /// Join, move, or leave a voice channel.
    UpdateVoiceState = 4,
    /// Continue a prior session.
    Resume = 6,
    /// Server asks the client to reconnect.
    Reconnect = 7,
    /// Request guild member chunks.
    RequestGuildMembers = 8,
    /// The session can no longer be used; body says whether a resume
    /// may still work.
    InvalidSession = 9,
    /// First frame on every connection, carries the heartbeat interval.
    Hello = 10,
    /// Acknowledges a client heartbeat.
    HeartbeatAck = 11,
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OpCode::Dispatch),
            1 => Ok(OpCode::Heartbeat),
            2 => Ok(OpCode::Identify),
            3 => Ok(OpCode::UpdatePresence),
            4 => Ok(OpCode::UpdateVoiceState),
            6 => Ok(OpCode::Resume),
            7 => Ok(OpCode::Reconnect),
            8 => Ok(OpCode::RequestGuildMembers),
            9 => Ok(OpCode::InvalidSession),
            10 => Ok(OpCode::Hello),
            11 => Ok(OpCode::HeartbeatAck),
            _ => Err("invalid op code"),
        }
    }
}
