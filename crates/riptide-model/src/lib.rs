//! # riptide-model
//!
//! External data contracts for the riptide realtime gateway client.
//!
//! These are the flat resource shapes the push service exchanges over its
//! dispatch frames, plus the text-rendering helpers that operate on them:
//!
//! - **User / Member / Role / Guild** - account and guild resources
//! - **Channel** - text, voice, category, and thread channels
//! - **Message** - chat messages, attachments, embeds, reactions, and
//!   the mention resolver
//! - **Presence / VoiceState** - per-user realtime status
//! - **StateLookup** - the cached-state collaborator consumed by the
//!   mention resolver
//!
//! Everything here is a plain serde struct; decoding and dispatch live in
//! the `riptide-protocol` and `riptide-gateway` crates.

pub mod channel;
pub mod command;
pub mod guild;
pub mod integration;
pub mod invite;
pub mod message;
pub mod presence;
pub mod state;
pub mod user;
pub mod voice;

pub use channel::{Channel, ChannelType, PermissionOverwrite, ThreadMember, ThreadMetadata};
pub use command::{ApplicationCommand, ApplicationCommandOption, ApplicationCommandOptionType};
pub use guild::{Ban, Emoji, Guild, Member, Role};
pub use integration::{Integration, IntegrationAccount};
pub use invite::Invite;
pub use message::{
    Message, MessageAttachment, MessageEmbed, MessageReaction, MessageReactions, MessageReference,
    MessageType,
};
pub use presence::{Activity, ActivityType, OnlineStatus, Presence};
pub use state::{StateError, StateLookup};
pub use user::User;
pub use voice::VoiceState;

/// ISO8601 timestamp as carried on the wire.
///
/// Kept as a string; the service is the source of truth and consumers
/// rarely need to do arithmetic on these.
pub type Timestamp = String;
