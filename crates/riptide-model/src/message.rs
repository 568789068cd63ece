//! Chat messages and mention rendering.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::guild::{Emoji, Member};
use crate::state::StateLookup;
use crate::user::User;
use crate::Timestamp;

/// Matches channel mention tokens, e.g. `<#1234>`.
static CHANNEL_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new("<#[^>]*>").unwrap());

/// The kind of a message.
///
/// Open enumeration, same scheme as `ChannelType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MessageType {
    Default,
    RecipientAdd,
    RecipientRemove,
    Call,
    ChannelNameChange,
    ChannelIconChange,
    ChannelPinnedMessage,
    GuildMemberJoin,
    ThreadCreated,
    Reply,
    ChatInputCommand,
    ThreadStarterMessage,
    GuildInviteReminder,
    Unknown(u8),
}

impl From<u8> for MessageType {
    fn from(value: u8) -> Self {
        match value {
            0 => MessageType::Default,
            1 => MessageType::RecipientAdd,
            2 => MessageType::RecipientRemove,
            3 => MessageType::Call,
            4 => MessageType::ChannelNameChange,
            5 => MessageType::ChannelIconChange,
            6 => MessageType::ChannelPinnedMessage,
            7 => MessageType::GuildMemberJoin,
            18 => MessageType::ThreadCreated,
            19 => MessageType::Reply,
            20 => MessageType::ChatInputCommand,
            21 => MessageType::ThreadStarterMessage,
            22 => MessageType::GuildInviteReminder,
            other => MessageType::Unknown(other),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> u8 {
        match kind {
            MessageType::Default => 0,
            MessageType::RecipientAdd => 1,
            MessageType::RecipientRemove => 2,
            MessageType::Call => 3,
            MessageType::ChannelNameChange => 4,
            MessageType::ChannelIconChange => 5,
            MessageType::ChannelPinnedMessage => 6,
            MessageType::GuildMemberJoin => 7,
            MessageType::ThreadCreated => 18,
            MessageType::Reply => 19,
            MessageType::ChatInputCommand => 20,
            MessageType::ThreadStarterMessage => 21,
            MessageType::GuildInviteReminder => 22,
            MessageType::Unknown(other) => other,
        }
    }
}

impl Default for MessageType {
    fn default() -> Self {
        MessageType::Default
    }
}

/// A file attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageAttachment {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub proxy_url: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub width: u32,
}

/// Footer of an embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEmbedFooter {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Image or thumbnail of an embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEmbedImage {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub width: u32,
}

/// Author line of an embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEmbedAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// A single field of an embed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEmbedField {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// A rich embed inside a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEmbed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub color: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<MessageEmbedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MessageEmbedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<MessageEmbedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<MessageEmbedAuthor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<MessageEmbedField>,
}

/// Aggregate reaction count for one emoji on a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReactions {
    #[serde(default)]
    pub count: u32,
    /// Whether the current user reacted.
    #[serde(default)]
    pub me: bool,
    #[serde(default)]
    pub emoji: Emoji,
}

/// Reference to another message, sent with replies and crossposts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
}

/// A single user's reaction, as carried on reaction frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReaction {
    #[serde(default)]
    pub user_id: String,
    pub message_id: String,
    #[serde(default)]
    pub emoji: Emoji,
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
}

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The message's id.
    pub id: String,

    /// Channel the message was sent in.
    pub channel_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,

    /// Author of the message. Webhook messages carry a partial author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,

    /// Partial member record for the author, guild messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<Timestamp>,

    #[serde(default)]
    pub tts: bool,

    #[serde(default)]
    pub mention_everyone: bool,

    /// Users mentioned in the content.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<User>,

    /// Ids of roles mentioned in the content.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mention_roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MessageAttachment>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<MessageEmbed>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<MessageReactions>,

    #[serde(default)]
    pub pinned: bool,

    /// Set when a webhook produced the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: MessageType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,

    /// Feature bitmask.
    #[serde(default)]
    pub flags: u64,

    /// The message a reply points at, when the service resolves it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_message: Option<Box<Message>>,
}

impl Message {
    /// Replace user mention tokens with `@username`, using only the
    /// message's own mention list.
    ///
    /// Both the plain (`<@id>`) and nickname (`<@!id>`) forms resolve to
    /// the username here; nickname resolution needs cached guild state,
    /// see [`Message::content_with_rendered_mentions`].
    #[must_use]
    pub fn content_with_mentions_replaced(&self) -> String {
        let mut content = self.content.clone();
        for user in &self.mentions {
            let handle = format!("@{}", user.username);
            content = content
                .replace(&format!("<@{}>", user.id), &handle)
                .replace(&format!("<@!{}>", user.id), &handle);
        }
        content
    }

    /// Render user, role, and channel mention tokens, consulting a
    /// cached-state collaborator when one is supplied.
    ///
    /// Best-effort and never failing: without a collaborator, or when the
    /// message's channel is not cached, output degrades to
    /// [`Message::content_with_mentions_replaced`]; any token that cannot
    /// be resolved passes through verbatim.
    ///
    /// The plain form `<@id>` always renders the username while the
    /// nickname form `<@!id>` renders the guild nickname when the member
    /// is cached and carries one.
    #[must_use]
    pub fn content_with_rendered_mentions(&self, state: Option<&dyn StateLookup>) -> String {
        let Some(state) = state else {
            return self.content_with_mentions_replaced();
        };
        let Ok(channel) = state.channel(&self.channel_id) else {
            trace!(channel = %self.channel_id, "channel not cached, literal mention fallback");
            return self.content_with_mentions_replaced();
        };
        let guild_id = channel.guild_id.as_deref().unwrap_or_default();

        let mut content = self.content.clone();
        for user in &self.mentions {
            let mut nick = user.username.clone();
            if let Ok(member) = state.member(guild_id, &user.id) {
                if let Some(n) = member.nick {
                    if !n.is_empty() {
                        nick = n;
                    }
                }
            }
            content = content
                .replace(&format!("<@{}>", user.id), &format!("@{}", user.username))
                .replace(&format!("<@!{}>", user.id), &format!("@{}", nick));
        }

        for role_id in &self.mention_roles {
            if let Ok(role) = state.role(guild_id, role_id) {
                if role.mentionable {
                    content =
                        content.replace(&format!("<@&{}>", role.id), &format!("@{}", role.name));
                }
            }
        }

        CHANNEL_MENTION
            .replace_all(&content, |caps: &regex::Captures<'_>| {
                let token = &caps[0];
                let id = &token[2..token.len() - 1];
                match state.channel(id) {
                    Ok(channel) if !channel.kind.is_voice() => match channel.name {
                        Some(name) => format!("#{name}"),
                        None => token.to_string(),
                    },
                    _ => token.to_string(),
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, ChannelType};
    use crate::guild::Role;
    use crate::state::StateError;

    fn ann() -> User {
        User {
            id: "123".to_string(),
            username: "Ann".to_string(),
            ..Default::default()
        }
    }

    fn message(content: &str) -> Message {
        Message {
            id: "m1".to_string(),
            channel_id: "c1".to_string(),
            content: content.to_string(),
            mentions: vec![ann()],
            ..Default::default()
        }
    }

    struct FakeState;

    impl StateLookup for FakeState {
        fn channel(&self, channel_id: &str) -> Result<Channel, StateError> {
            match channel_id {
                "c1" => Ok(Channel {
                    id: "c1".to_string(),
                    guild_id: Some("g1".to_string()),
                    name: Some("general".to_string()),
                    ..Default::default()
                }),
                "c2" => Ok(Channel {
                    id: "c2".to_string(),
                    guild_id: Some("g1".to_string()),
                    name: Some("lounge".to_string()),
                    kind: ChannelType::GuildVoice,
                    ..Default::default()
                }),
                _ => Err(StateError::NotFound),
            }
        }

        fn member(&self, guild_id: &str, user_id: &str) -> Result<Member, StateError> {
            if guild_id == "g1" && user_id == "123" {
                Ok(Member {
                    nick: Some("Annie".to_string()),
                    user: Some(ann()),
                    ..Default::default()
                })
            } else {
                Err(StateError::NotFound)
            }
        }

        fn role(&self, guild_id: &str, role_id: &str) -> Result<Role, StateError> {
            match (guild_id, role_id) {
                ("g1", "70") => Ok(Role {
                    id: "70".to_string(),
                    name: "mods".to_string(),
                    mentionable: true,
                    ..Default::default()
                }),
                ("g1", "71") => Ok(Role {
                    id: "71".to_string(),
                    name: "secret".to_string(),
                    mentionable: false,
                    ..Default::default()
                }),
                _ => Err(StateError::NotFound),
            }
        }
    }

    #[test]
    fn test_literal_replacement_without_collaborator() {
        let msg = message("<@123> hi <@!123> bye");
        assert_eq!(msg.content_with_mentions_replaced(), "@Ann hi @Ann bye");
        assert_eq!(
            msg.content_with_rendered_mentions(None),
            "@Ann hi @Ann bye"
        );
    }

    #[test]
    fn test_nickname_form_uses_cached_nick() {
        let msg = message("<@123> hi <@!123> bye");
        assert_eq!(
            msg.content_with_rendered_mentions(Some(&FakeState)),
            "@Ann hi @Annie bye"
        );
    }

    #[test]
    fn test_channel_miss_falls_back_to_literal() {
        let mut msg = message("<@!123> hello");
        msg.channel_id = "nope".to_string();
        assert_eq!(
            msg.content_with_rendered_mentions(Some(&FakeState)),
            "@Ann hello"
        );
    }

    #[test]
    fn test_role_mentions_respect_mentionable() {
        let mut msg = message("ping <@&70> and <@&71> and <@&72>");
        msg.mentions.clear();
        msg.mention_roles = vec!["70".to_string(), "71".to_string(), "72".to_string()];
        assert_eq!(
            msg.content_with_rendered_mentions(Some(&FakeState)),
            "ping @mods and <@&71> and <@&72>"
        );
    }

    #[test]
    fn test_channel_mentions() {
        let mut msg = message("see <#c1>, hear <#c2>, miss <#c9>");
        msg.mentions.clear();
        assert_eq!(
            msg.content_with_rendered_mentions(Some(&FakeState)),
            "see #general, hear <#c2>, miss <#c9>"
        );
    }

    #[test]
    fn test_unmentioned_tokens_pass_through() {
        let msg = message("<@999> unknown");
        assert_eq!(msg.content_with_mentions_replaced(), "<@999> unknown");
    }
}
