//! Gateway error taxonomy.

use std::time::Duration;

use thiserror::Error;

use riptide_protocol::{EnvelopeError, OpCode, PayloadDecodeError};

use crate::connection::ConnectionError;

/// Errors surfaced by the gateway session.
///
/// Of these only [`GatewayError::Transport`] ends a connection
/// generation; everything else is contained to the operation that
/// raised it. Mid-stream failures never surface here at all: the read
/// path reports malformed envelopes, undecodable payloads, and handler
/// faults through diagnostics and synthetic events only.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// `connect` was called while a connection is already open.
    #[error("gateway connection already open")]
    AlreadyOpen,

    /// An outbound operation was attempted with no open connection.
    #[error("gateway connection is not open")]
    NotOpen,

    /// The underlying transport failed.
    #[error("transport: {0}")]
    Transport(#[from] ConnectionError),

    /// A handshake frame could not be decoded.
    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    /// A handshake body could not be decoded.
    #[error("payload: {0}")]
    Payload(#[from] PayloadDecodeError),

    /// The server opened with something other than the expected op.
    #[error("handshake expected {expected:?}, received {received:?}")]
    UnexpectedHandshake { expected: OpCode, received: OpCode },

    /// A privileged outbound operation hit its token gate. The caller
    /// decides whether to wait out `retry_after` or abort.
    #[error("rate limited on bucket {bucket:?}, retry after {retry_after:?}")]
    RateLimited {
        bucket: String,
        retry_after: Duration,
    },
}
