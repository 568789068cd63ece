//! First-stage envelope decoding.
//!
//! Every inbound frame is a JSON object with the generic fields `op`,
//! `s`, `t`, and `d`. Decoding here is pure and leaves the body opaque;
//! resolving the kind tag to a concrete shape is the registry's job.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

use crate::opcode::OpCode;

/// Envelope decoding and encoding failures.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The frame is not a valid envelope: not JSON, or the op code is
    /// missing or unknown. The frame is dropped, the connection lives on.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// An outbound payload failed to serialize.
    #[error("encoding envelope: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The generic wire wrapper around every inbound frame.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Operation code.
    pub op: OpCode,

    /// Sequence number, present on dispatch frames. Monotonic within a
    /// connection generation.
    #[serde(rename = "s", default)]
    pub sequence: Option<u64>,

    /// Kind tag, present only on dispatch frames.
    #[serde(rename = "t", default)]
    pub kind: Option<String>,

    /// Opaque body; shape depends on the op and kind.
    #[serde(rename = "d", default)]
    pub body: Option<Box<RawValue>>,
}

/// Decode an inbound frame into an [`Envelope`].
///
/// # Errors
///
/// Returns [`EnvelopeError::Malformed`] when the frame is not JSON or
/// the op code is missing or invalid.
pub fn decode(raw: &str) -> Result<Envelope, EnvelopeError> {
    serde_json::from_str(raw).map_err(|e| EnvelopeError::Malformed(e.to_string()))
}

#[derive(Serialize)]
struct Outbound<'a, T> {
    op: OpCode,
    d: &'a T,
}

/// Encode an outbound command as an envelope frame.
///
/// # Errors
///
/// Returns [`EnvelopeError::Encode`] if the body fails to serialize.
pub fn encode<T: Serialize>(op: OpCode, body: &T) -> Result<String, EnvelopeError> {
    serde_json::to_string(&Outbound { op, d: body }).map_err(EnvelopeError::Encode)
}
