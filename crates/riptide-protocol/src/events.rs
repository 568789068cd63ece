//! Typed dispatch payload shapes.
//!
//! One struct per recognized kind. Update kinds whose wire shape is a
//! strict superset of their Create counterpart embed that counterpart
//! with `#[serde(flatten)]` rather than repeating its field list, and
//! expose flattened accessors for the nested resource.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use riptide_model::channel::{Channel, ChannelType, ThreadMember};
use riptide_model::command::ApplicationCommand;
use riptide_model::guild::{Emoji, Guild, Member, Role};
use riptide_model::integration::Integration;
use riptide_model::message::{Message, MessageReaction};
use riptide_model::presence::Presence;
use riptide_model::user::User;
use riptide_model::voice::VoiceState;
use riptide_model::Timestamp;

/// Payload of the `READY` dispatch, completing an identify handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ready {
    #[serde(rename = "v", default)]
    pub version: u32,

    /// The connected account.
    pub user: User,

    /// Session id to present when resuming.
    pub session_id: String,

    /// Guilds the account belongs to, initially unavailable shells.
    #[serde(default)]
    pub guilds: Vec<Guild>,

    #[serde(default)]
    pub private_channels: Vec<Channel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<[u32; 2]>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presences: Vec<Presence>,
}

/// Payload of the `RESUMED` dispatch, completing a resume handshake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resumed {
    #[serde(rename = "_trace", default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<String>,
}

// ─── Channels and threads ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelCreate {
    #[serde(flatten)]
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelUpdate {
    #[serde(flatten)]
    pub create: ChannelCreate,
}

impl ChannelUpdate {
    /// The updated channel.
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.create.channel
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDelete {
    #[serde(flatten)]
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPinsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pin_timestamp: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadCreate {
    #[serde(flatten)]
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadUpdate {
    #[serde(flatten)]
    pub create: ThreadCreate,
}

impl ThreadUpdate {
    /// The updated thread.
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.create.channel
    }
}

/// Thread deletes carry only identifying fields, not the full channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadDelete {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ChannelType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadListSync {
    pub guild_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_ids: Option<Vec<String>>,
    #[serde(default)]
    pub threads: Vec<Channel>,
    #[serde(default)]
    pub members: Vec<ThreadMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMemberUpdate {
    #[serde(flatten)]
    pub member: ThreadMember,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMembersUpdate {
    pub id: String,
    pub guild_id: String,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub added_members: Vec<ThreadMember>,
    #[serde(default)]
    pub removed_member_ids: Vec<String>,
}

// ─── Guilds ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildCreate {
    #[serde(flatten)]
    pub guild: Guild,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildUpdate {
    #[serde(flatten)]
    pub create: GuildCreate,
}

impl GuildUpdate {
    /// The updated guild.
    #[must_use]
    pub fn guild(&self) -> &Guild {
        &self.create.guild
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildDelete {
    #[serde(flatten)]
    pub guild: Guild,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildBanAdd {
    pub guild_id: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildBanRemove {
    pub guild_id: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberAdd {
    #[serde(flatten)]
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberUpdate {
    #[serde(flatten)]
    pub add: GuildMemberAdd,
}

impl GuildMemberUpdate {
    /// The updated member.
    #[must_use]
    pub fn member(&self) -> &Member {
        &self.add.member
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberRemove {
    #[serde(flatten)]
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMembersChunk {
    pub guild_id: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub chunk_index: u32,
    #[serde(default)]
    pub chunk_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_found: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presences: Vec<Presence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRoleCreate {
    pub guild_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRoleUpdate {
    #[serde(flatten)]
    pub create: GuildRoleCreate,
}

impl GuildRoleUpdate {
    /// The updated role.
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.create.role
    }

    /// The guild the role belongs to.
    #[must_use]
    pub fn guild_id(&self) -> &str {
        &self.create.guild_id
    }
}

/// Role deletes carry only the ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRoleDelete {
    pub guild_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildEmojisUpdate {
    pub guild_id: String,
    #[serde(default)]
    pub emojis: Vec<Emoji>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildIntegrationsUpdate {
    pub guild_id: String,
}

// ─── Integrations ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationCreate {
    #[serde(flatten)]
    pub integration: Integration,
    pub guild_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationUpdate {
    #[serde(flatten)]
    pub create: IntegrationCreate,
}

impl IntegrationUpdate {
    /// The updated integration.
    #[must_use]
    pub fn integration(&self) -> &Integration {
        &self.create.integration
    }
}

/// Integration deletes carry only identifying fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationDelete {
    pub id: String,
    pub guild_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

// ─── Messages ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreate {
    #[serde(flatten)]
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageUpdate {
    #[serde(flatten)]
    pub create: MessageCreate,
}

impl MessageUpdate {
    /// The updated message.
    #[must_use]
    pub fn message(&self) -> &Message {
        &self.create.message
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDelete {
    #[serde(flatten)]
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDeleteBulk {
    #[serde(rename = "ids")]
    pub messages: Vec<String>,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionAdd {
    #[serde(flatten)]
    pub reaction: MessageReaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionRemove {
    #[serde(flatten)]
    pub reaction: MessageReaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionRemoveAll {
    #[serde(flatten)]
    pub reaction: MessageReaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReactionRemoveEmoji {
    #[serde(flatten)]
    pub reaction: MessageReaction,
}

// ─── Presence, typing, users, voice ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceUpdate {
    #[serde(flatten)]
    pub presence: Presence,
}

/// Full presence-list replacement; the body is a bare array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresencesReplace(pub Vec<Presence>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingStart {
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(flatten)]
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceStateUpdate {
    #[serde(flatten)]
    pub state: VoiceState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceServerUpdate {
    pub token: String,
    pub guild_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// ─── Webhooks and invites ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhooksUpdate {
    pub guild_id: String,
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteCreate {
    pub channel_id: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inviter: Option<User>,
    #[serde(default)]
    pub max_age: u32,
    #[serde(default)]
    pub max_uses: u32,
    #[serde(default, rename = "target_user", skip_serializing_if = "Option::is_none")]
    pub target: Option<User>,
    #[serde(default)]
    pub temporary: bool,
    #[serde(default)]
    pub uses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteDelete {
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub code: String,
}

// ─── Application commands ───

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandCreate {
    #[serde(flatten)]
    pub command: ApplicationCommand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandUpdate {
    #[serde(flatten)]
    pub create: ApplicationCommandCreate,
}

impl ApplicationCommandUpdate {
    /// The updated command.
    #[must_use]
    pub fn command(&self) -> &ApplicationCommand {
        &self.create.command
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandDelete {
    #[serde(flatten)]
    pub create: ApplicationCommandCreate,
}

impl ApplicationCommandDelete {
    /// The deleted command.
    #[must_use]
    pub fn command(&self) -> &ApplicationCommand {
        &self.create.command
    }
}

// ─── Synthetic events ───
//
// Emitted by the session itself, never carried on the wire, but they
// flow through the same dispatch pipeline as wire-sourced payloads.

/// The session opened a gateway connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connect;

/// The session lost or closed its gateway connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Disconnect;

/// A privileged outbound operation hit its token gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    /// Name of the exhausted bucket, e.g. `"identify"`.
    pub bucket: String,
    /// How long until the bucket refills.
    pub retry_after: Duration,
}
