//! Dispatch kind tags.

use std::fmt;

/// Kind tag attached to dispatch frames.
///
/// The enumeration is open: tags this library does not recognize decode
/// to [`EventKind::Unknown`], which keeps the stream alive and still
/// reaches wildcard handlers. The three synthetic kinds are emitted by
/// the session itself and never appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Resumed,
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,
    ChannelPinsUpdate,
    ThreadCreate,
    ThreadUpdate,
    ThreadDelete,
    ThreadListSync,
    ThreadMemberUpdate,
    ThreadMembersUpdate,
    GuildCreate,
    GuildUpdate,
    GuildDelete,
    GuildBanAdd,
    GuildBanRemove,
    GuildMemberAdd,
    GuildMemberUpdate,
    GuildMemberRemove,
    GuildMembersChunk,
    GuildRoleCreate,
    GuildRoleUpdate,
    GuildRoleDelete,
    GuildEmojisUpdate,
    GuildIntegrationsUpdate,
    IntegrationCreate,
    IntegrationUpdate,
    IntegrationDelete,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    MessageDeleteBulk,
    MessageReactionAdd,
    MessageReactionRemove,
    MessageReactionRemoveAll,
    MessageReactionRemoveEmoji,
    PresenceUpdate,
    PresencesReplace,
    TypingStart,
    UserUpdate,
    VoiceStateUpdate,
    VoiceServerUpdate,
    WebhooksUpdate,
    InviteCreate,
    InviteDelete,
    ApplicationCommandCreate,
    ApplicationCommandUpdate,
    ApplicationCommandDelete,
    /// Synthetic: the session opened a connection.
    Connect,
    /// Synthetic: the session lost or closed its connection.
    Disconnect,
    /// Synthetic: a privileged outbound operation hit its token gate.
    RateLimit,
    /// Catch-all for tags this library does not know.
    Unknown(String),
}

impl EventKind {
    /// Resolve a wire tag to a kind, degrading to
    /// [`EventKind::Unknown`] for unrecognized tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "READY" => EventKind::Ready,
            "RESUMED" => EventKind::Resumed,
            "CHANNEL_CREATE" => EventKind::ChannelCreate,
            "CHANNEL_UPDATE" => EventKind::ChannelUpdate,
            "CHANNEL_DELETE" => EventKind::ChannelDelete,
            "CHANNEL_PINS_UPDATE" => EventKind::ChannelPinsUpdate,
            "THREAD_CREATE" => EventKind::ThreadCreate,
            "THREAD_UPDATE" => EventKind::ThreadUpdate,
            "THREAD_DELETE" => EventKind::ThreadDelete,
            "THREAD_LIST_SYNC" => EventKind::ThreadListSync,
            "THREAD_MEMBER_UPDATE" => EventKind::ThreadMemberUpdate,
            "THREAD_MEMBERS_UPDATE" => EventKind::ThreadMembersUpdate,
            "GUILD_CREATE" => EventKind::GuildCreate,
            "GUILD_UPDATE" => EventKind::GuildUpdate,
            "GUILD_DELETE" => EventKind::GuildDelete,
            "GUILD_BAN_ADD" => EventKind::GuildBanAdd,
            "GUILD_BAN_REMOVE" => EventKind::GuildBanRemove,
            "GUILD_MEMBER_ADD" => EventKind::GuildMemberAdd,
            "GUILD_MEMBER_UPDATE" => EventKind::GuildMemberUpdate,
            "GUILD_MEMBER_REMOVE" => EventKind::GuildMemberRemove,
            "GUILD_MEMBERS_CHUNK" => EventKind::GuildMembersChunk,
            "GUILD_ROLE_CREATE" => EventKind::GuildRoleCreate,
            "GUILD_ROLE_UPDATE" => EventKind::GuildRoleUpdate,
            "GUILD_ROLE_DELETE" => EventKind::GuildRoleDelete,
            "GUILD_EMOJIS_UPDATE" => EventKind::GuildEmojisUpdate,
            "GUILD_INTEGRATIONS_UPDATE" => EventKind::GuildIntegrationsUpdate,
            "INTEGRATION_CREATE" => EventKind::IntegrationCreate,
            "INTEGRATION_UPDATE" => EventKind::IntegrationUpdate,
            "INTEGRATION_DELETE" => EventKind::IntegrationDelete,
            "MESSAGE_CREATE" => EventKind::MessageCreate,
            "MESSAGE_UPDATE" => EventKind::MessageUpdate,
            "MESSAGE_DELETE" => EventKind::MessageDelete,
            "MESSAGE_DELETE_BULK" => EventKind::MessageDeleteBulk,
            "MESSAGE_REACTION_ADD" => EventKind::MessageReactionAdd,
            "MESSAGE_REACTION_REMOVE" => EventKind::MessageReactionRemove,
            "MESSAGE_REACTION_REMOVE_ALL" => EventKind::MessageReactionRemoveAll,
            "MESSAGE_REACTION_REMOVE_EMOJI" => EventKind::MessageReactionRemoveEmoji,
            "PRESENCE_UPDATE" => EventKind::PresenceUpdate,
            "PRESENCES_REPLACE" => EventKind::PresencesReplace,
            "TYPING_START" => EventKind::TypingStart,
            "USER_UPDATE" => EventKind::UserUpdate,
            "VOICE_STATE_UPDATE" => EventKind::VoiceStateUpdate,
            "VOICE_SERVER_UPDATE" => EventKind::VoiceServerUpdate,
            "WEBHOOKS_UPDATE" => EventKind::WebhooksUpdate,
            "INVITE_CREATE" => EventKind::InviteCreate,
            "INVITE_DELETE" => EventKind::InviteDelete,
            "APPLICATION_COMMAND_CREATE" => EventKind::ApplicationCommandCreate,
            "APPLICATION_COMMAND_UPDATE" => EventKind::ApplicationCommandUpdate,
            "APPLICATION_COMMAND_DELETE" => EventKind::ApplicationCommandDelete,
            "__CONNECT__" => EventKind::Connect,
            "__DISCONNECT__" => EventKind::Disconnect,
            "__RATE_LIMIT__" => EventKind::RateLimit,
            other => EventKind::Unknown(other.to_string()),
        }
    }

    /// The tag for this kind, the original tag for unknown kinds.
    #[must_use]
    pub fn as_tag(&self) -> &str {
        match self {
            EventKind::Ready => "READY",
            EventKind::Resumed => "RESUMED",
            EventKind::ChannelCreate => "CHANNEL_CREATE",
            EventKind::ChannelUpdate => "CHANNEL_UPDATE",
            EventKind::ChannelDelete => "CHANNEL_DELETE",
            EventKind::ChannelPinsUpdate => "CHANNEL_PINS_UPDATE",
            EventKind::ThreadCreate => "THREAD_CREATE",
            EventKind::ThreadUpdate => "THREAD_UPDATE",
            EventKind::ThreadDelete => "THREAD_DELETE",
            EventKind::ThreadListSync => "THREAD_LIST_SYNC",
            EventKind::ThreadMemberUpdate => "THREAD_MEMBER_UPDATE",
            EventKind::ThreadMembersUpdate => "THREAD_MEMBERS_UPDATE",
            EventKind::GuildCreate => "GUILD_CREATE",
            EventKind::GuildUpdate => "GUILD_UPDATE",
            EventKind::GuildDelete => "GUILD_DELETE",
            EventKind::GuildBanAdd => "GUILD_BAN_ADD",
            EventKind::GuildBanRemove => "GUILD_BAN_REMOVE",
            EventKind::GuildMemberAdd => "GUILD_MEMBER_ADD",
            EventKind::GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
            EventKind::GuildMemberRemove => "GUILD_MEMBER_REMOVE",
            EventKind::GuildMembersChunk => "GUILD_MEMBERS_CHUNK",
            EventKind::GuildRoleCreate => "GUILD_ROLE_CREATE",
            EventKind::GuildRoleUpdate => "GUILD_ROLE_UPDATE",
            EventKind::GuildRoleDelete => "GUILD_ROLE_DELETE",
            EventKind::GuildEmojisUpdate => "GUILD_EMOJIS_UPDATE",
            EventKind::GuildIntegrationsUpdate => "GUILD_INTEGRATIONS_UPDATE",
            EventKind::IntegrationCreate => "INTEGRATION_CREATE",
            EventKind::IntegrationUpdate => "INTEGRATION_UPDATE",
            EventKind::IntegrationDelete => "INTEGRATION_DELETE",
            EventKind::MessageCreate => "MESSAGE_CREATE",
            EventKind::MessageUpdate => "MESSAGE_UPDATE",
            EventKind::MessageDelete => "MESSAGE_DELETE",
            EventKind::MessageDeleteBulk => "MESSAGE_DELETE_BULK",
            EventKind::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            EventKind::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
            EventKind::MessageReactionRemoveAll => "MESSAGE_REACTION_REMOVE_ALL",
            EventKind::MessageReactionRemoveEmoji => "MESSAGE_REACTION_REMOVE_EMOJI",
            EventKind::PresenceUpdate => "PRESENCE_UPDATE",
            EventKind::PresencesReplace => "PRESENCES_REPLACE",
            EventKind::TypingStart => "TYPING_START",
            EventKind::UserUpdate => "USER_UPDATE",
            EventKind::VoiceStateUpdate => "VOICE_STATE_UPDATE",
            EventKind::VoiceServerUpdate => "VOICE_SERVER_UPDATE",
            EventKind::WebhooksUpdate => "WEBHOOKS_UPDATE",
            EventKind::InviteCreate => "INVITE_CREATE",
            EventKind::InviteDelete => "INVITE_DELETE",
            EventKind::ApplicationCommandCreate => "APPLICATION_COMMAND_CREATE",
            EventKind::ApplicationCommandUpdate => "APPLICATION_COMMAND_UPDATE",
            EventKind::ApplicationCommandDelete => "APPLICATION_COMMAND_DELETE",
            EventKind::Connect => "__CONNECT__",
            EventKind::Disconnect => "__DISCONNECT__",
            EventKind::RateLimit => "__RATE_LIMIT__",
            EventKind::Unknown(tag) => tag,
        }
    }

    /// Whether the session itself originates this kind rather than the
    /// wire.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(
            self,
            EventKind::Connect | EventKind::Disconnect | EventKind::RateLimit
        )
    }

    /// Whether this library knows a concrete shape for the kind.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Unknown(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
