//! # riptide-protocol
//!
//! Wire protocol definitions for the riptide realtime gateway client.
//!
//! Inbound traffic is a stream of JSON envelopes. Decoding is two-stage:
//! the envelope decoder parses the generic fields and leaves the body
//! opaque, then the payload registry resolves the kind tag to a concrete
//! shape.
//!
//! ```text
//! ┌───────────┐     ┌──────────────┐     ┌───────────────┐
//! │ raw frame │────▶│   Envelope   │────▶│    Payload    │
//! └───────────┘     │ (op, s, t, d)│     │ (typed event) │
//!                   └──────────────┘     └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use riptide_protocol::{envelope, registry, EventKind, OpCode, Payload};
//!
//! let frame = r#"{"op":0,"s":42,"t":"TYPING_START",
//!                 "d":{"channel_id":"1","user_id":"2","timestamp":0}}"#;
//! let env = envelope::decode(frame).unwrap();
//! assert_eq!(env.op, OpCode::Dispatch);
//!
//! let kind = EventKind::from_tag(env.kind.as_deref().unwrap());
//! let payload = registry::decode_body(&kind, env.body.as_deref()).unwrap();
//! assert!(matches!(payload, Payload::TypingStart(_)));
//! ```

pub mod commands;
pub mod envelope;
pub mod events;
pub mod kind;
pub mod opcode;
pub mod registry;

pub use commands::{Hello, Identify, IdentifyProperties, RequestGuildMembers, Resume, UpdatePresence};
pub use envelope::{decode, encode, Envelope, EnvelopeError};
pub use events::{Connect, Disconnect, RateLimit};
pub use kind::EventKind;
pub use opcode::OpCode;
pub use registry::{DispatchPayload, Payload, PayloadDecodeError, UnknownEvent};
