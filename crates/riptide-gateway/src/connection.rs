//! Transport seam for the gateway session.
//!
//! The session is transport-agnostic: it drives a [`FrameStream`] from
//! its read task and serializes all writes through a [`FrameSink`]. A
//! [`Connector`] produces the two halves for each connection generation.
//! Handshake, TLS, and compression negotiation live behind the
//! connector; the session only sees raw frames.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The connection is closed.
    #[error("connection closed")]
    Closed,

    /// No heartbeat acknowledgement arrived within the interval.
    #[error("connection timed out")]
    Timeout,

    /// Establishing the connection failed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Failed to send a frame.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Failed to receive a frame.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The inbound half of a connection, owned by the read task.
#[async_trait]
pub trait FrameStream: Send {
    /// Receive the next raw frame.
    ///
    /// Returns `None` when the peer closes the connection cleanly.
    async fn next_frame(&mut self) -> Result<Option<String>, ConnectionError>;
}

/// The outbound half of a connection, guarded by the session's write
/// lock so frames never interleave.
#[async_trait]
pub trait FrameSink: Send {
    /// Send one raw frame.
    async fn send_frame(&mut self, frame: String) -> Result<(), ConnectionError>;

    /// Close the connection gracefully.
    async fn close(&mut self) -> Result<(), ConnectionError>;
}

/// Establishes connections for the session.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to `url` and hand back its two halves.
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameStream>), ConnectionError>;

    /// Transport name for diagnostics.
    fn name(&self) -> &'static str {
        "connector"
    }
}
