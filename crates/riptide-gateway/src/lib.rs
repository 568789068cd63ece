//! # riptide-gateway
//!
//! Session, dispatch, and transport runtime for the riptide realtime
//! gateway client.
//!
//! A [`Session`] holds one long-lived, resumable connection to the push
//! gateway. Each physical connection runs a dedicated read task
//! (read → decode → dispatch) and a heartbeat task; writes serialize
//! through a single write lock so frames never interleave.
//!
//! ```text
//! ┌───────────┐   frames   ┌─────────┐   payloads   ┌────────────┐
//! │ Connector │───────────▶│ Session │─────────────▶│ Dispatcher │
//! └───────────┘            └─────────┘              └────────────┘
//!       ▲                       │                         │
//!       │ reconnect / resume    │ heartbeat, commands     ▼
//!       └───────────────────────┴──────────────────  handlers
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use riptide_gateway::{GatewayConfig, Session};
//! use riptide_protocol::events::MessageCreate;
//!
//! # async fn run() -> Result<(), riptide_gateway::GatewayError> {
//! let session = Session::new(GatewayConfig::with_token("token"));
//!
//! session.on::<MessageCreate, _>(|_session, event| {
//!     println!("{}", event.message.content_with_mentions_replaced());
//! });
//!
//! session.connect().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod ratelimit;
pub mod session;
pub mod websocket;

pub use config::{
    DispatchConfig, GatewayConfig, HeartbeatConfig, IdentityConfig, LimitsConfig, ReconnectConfig,
};
pub use connection::{ConnectionError, Connector, FrameSink, FrameStream};
pub use dispatch::ExecutionPolicy;
pub use error::GatewayError;
pub use handler::Subscription;
pub use ratelimit::{RateLimiter, IDENTIFY_BUCKET};
pub use session::{Session, Status};
pub use websocket::WebSocketConnector;
